use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;
use core::marker::PhantomData;

use thiserror::Error;

use crate::info::{Type, Typed};
use crate::value::{Any, BoxedObject};

// -----------------------------------------------------------------------------
// InvokeError

/// Failure of a method or constructor call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvokeError {
    #[error("expected {expected} arguments, got {found}")]
    ArgCount { expected: usize, found: usize },
    #[error("argument {index} should be `{expected}`, got `{found}`")]
    ArgType {
        index: usize,
        expected: &'static str,
        found: &'static str,
    },
    #[error("the receiver is not a `{expected}`")]
    Receiver { expected: &'static str },
    #[error("the method needs a mutable receiver")]
    ReadOnly,
}

// -----------------------------------------------------------------------------
// Helpers

/// The object a method is called on.
pub(crate) enum Target<'o> {
    Ref(&'o dyn core::any::Any),
    Mut(&'o mut dyn core::any::Any),
}

impl<'o> Target<'o> {
    fn get<T: Typed>(self) -> Result<&'o T, InvokeError> {
        let object: &'o dyn core::any::Any = match self {
            Target::Ref(object) => object,
            Target::Mut(object) => object,
        };
        object.downcast_ref::<T>().ok_or(InvokeError::Receiver {
            expected: T::type_path(),
        })
    }

    fn get_mut<T: Typed>(self) -> Result<&'o mut T, InvokeError> {
        match self {
            Target::Ref(_) => Err(InvokeError::ReadOnly),
            Target::Mut(object) => object.downcast_mut::<T>().ok_or(InvokeError::Receiver {
                expected: T::type_path(),
            }),
        }
    }
}

fn check_count(args: &[Any], expected: usize) -> Result<(), InvokeError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(InvokeError::ArgCount {
            expected,
            found: args.len(),
        })
    }
}

fn arg<A: Typed + Clone>(args: &[Any], index: usize) -> Result<A, InvokeError> {
    let value = args.get(index).ok_or(InvokeError::ArgCount {
        expected: index + 1,
        found: args.len(),
    })?;
    value
        .get::<A>()
        .cloned()
        .ok_or_else(|| InvokeError::ArgType {
            index,
            expected: A::type_path(),
            found: value.ty().map_or("<empty>", Type::path),
        })
}

type MethodThunk = dyn Fn(Target<'_>, &[Any]) -> Result<Any, InvokeError> + Send + Sync;
type CtorThunk = dyn Fn(&[Any]) -> Result<BoxedObject, InvokeError> + Send + Sync;

fn method_thunk<F>(func: F) -> Box<MethodThunk>
where
    F: Fn(Target<'_>, &[Any]) -> Result<Any, InvokeError> + Send + Sync + 'static,
{
    Box::new(func)
}

fn ctor_thunk<F>(func: F) -> Box<CtorThunk>
where
    F: Fn(&[Any]) -> Result<BoxedObject, InvokeError> + Send + Sync + 'static,
{
    Box::new(func)
}

// -----------------------------------------------------------------------------
// AnyFn

/// How a method borrows its receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Receiver {
    /// `&self`
    Ref,
    /// `&mut self`
    Mut,
}

/// A type-erased method.
///
/// Arguments and the return value travel as [`Any`]; argument types must
/// match exactly. Built from closures or method paths through
/// [`IntoMethod`], for up to three arguments besides the receiver.
///
/// # Examples
///
/// ```
/// use dv_reflect::Any;
/// use dv_reflect::value::AnyFn;
///
/// let len = AnyFn::new(|s: &String| s.len());
/// let push = AnyFn::new(|s: &mut String, c: char| s.push(c));
///
/// let mut text = String::from("ab");
/// push.invoke_mut(&mut text, &[Any::new('c')]).unwrap();
///
/// let out = len.invoke(&text, &[]).unwrap();
/// assert_eq!(out.get::<usize>(), Some(&3));
/// assert!(push.invoke(&text, &[Any::new('d')]).is_err());
/// ```
pub struct AnyFn {
    receiver: Receiver,
    self_type: &'static Type,
    arg_types: Vec<&'static Type>,
    return_type: &'static Type,
    thunk: Box<MethodThunk>,
}

impl AnyFn {
    pub fn new<T, Marker>(func: impl IntoMethod<T, Marker>) -> Self {
        func.into_method()
    }

    #[inline]
    pub fn receiver(&self) -> Receiver {
        self.receiver
    }

    /// Type of the receiver.
    #[inline]
    pub fn self_type(&self) -> &'static Type {
        self.self_type
    }

    #[inline]
    pub fn arg_types(&self) -> &[&'static Type] {
        &self.arg_types
    }

    #[inline]
    pub fn return_type(&self) -> &'static Type {
        self.return_type
    }

    /// Calls a `&self` method.
    ///
    /// `&mut self` methods fail with [`InvokeError::ReadOnly`].
    pub fn invoke(&self, object: &dyn core::any::Any, args: &[Any]) -> Result<Any, InvokeError> {
        (self.thunk)(Target::Ref(object), args)
    }

    /// Calls a method of either receiver kind.
    pub fn invoke_mut(
        &self,
        object: &mut dyn core::any::Any,
        args: &[Any],
    ) -> Result<Any, InvokeError> {
        (self.thunk)(Target::Mut(object), args)
    }
}

impl fmt::Debug for AnyFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyFn")
            .field("receiver", &self.receiver)
            .field("self_type", &self.self_type)
            .field("arg_types", &self.arg_types)
            .field("return_type", &self.return_type)
            .finish()
    }
}

/// Conversion of a function into an [`AnyFn`] with receiver `T`.
///
/// `Marker` only separates the implementations for different arities.
pub trait IntoMethod<T, Marker>: Send + Sync + 'static {
    fn into_method(self) -> AnyFn;
}

#[doc(hidden)]
pub struct RefMethod<Args, R>(PhantomData<fn(Args) -> R>);

#[doc(hidden)]
pub struct MutMethod<Args, R>(PhantomData<fn(Args) -> R>);

macro_rules! impl_into_method {
    ($count:literal $(, $arg:ident => $idx:tt)*) => {
        impl<T, R, Func $(, $arg)*> IntoMethod<T, RefMethod<($($arg,)*), R>> for Func
        where
            T: Typed,
            R: Typed + Clone + Send + Sync,
            $($arg: Typed + Clone + Send + Sync,)*
            Func: Fn(&T $(, $arg)*) -> R + Send + Sync + 'static,
        {
            fn into_method(self) -> AnyFn {
                AnyFn {
                    receiver: Receiver::Ref,
                    self_type: T::ty(),
                    arg_types: vec![$(<$arg as Typed>::ty()),*],
                    return_type: R::ty(),
                    thunk: method_thunk(move |target, args| {
                        check_count(args, $count)?;
                        let this = target.get::<T>()?;
                        Ok(Any::new((self)(this $(, arg::<$arg>(args, $idx)?)*)))
                    }),
                }
            }
        }

        impl<T, R, Func $(, $arg)*> IntoMethod<T, MutMethod<($($arg,)*), R>> for Func
        where
            T: Typed,
            R: Typed + Clone + Send + Sync,
            $($arg: Typed + Clone + Send + Sync,)*
            Func: Fn(&mut T $(, $arg)*) -> R + Send + Sync + 'static,
        {
            fn into_method(self) -> AnyFn {
                AnyFn {
                    receiver: Receiver::Mut,
                    self_type: T::ty(),
                    arg_types: vec![$(<$arg as Typed>::ty()),*],
                    return_type: R::ty(),
                    thunk: method_thunk(move |target, args| {
                        check_count(args, $count)?;
                        let this = target.get_mut::<T>()?;
                        Ok(Any::new((self)(this $(, arg::<$arg>(args, $idx)?)*)))
                    }),
                }
            }
        }
    };
}

impl_into_method!(0);
impl_into_method!(1, A0 => 0);
impl_into_method!(2, A0 => 0, A1 => 1);
impl_into_method!(3, A0 => 0, A1 => 1, A2 => 2);

// -----------------------------------------------------------------------------
// AnyCtor

/// A type-erased constructor producing a [`BoxedObject`].
///
/// # Examples
///
/// ```
/// use dv_reflect::Any;
/// use dv_reflect::value::AnyCtor;
///
/// let repeat = AnyCtor::new(|c: char, n: usize| String::from(c).repeat(n));
/// let object = repeat.create(&[Any::new('x'), Any::new(3_usize)]).unwrap();
///
/// assert_eq!(object.downcast_ref::<String>().unwrap(), "xxx");
/// assert!(repeat.create(&[Any::new('x')]).is_err());
/// ```
pub struct AnyCtor {
    ty: &'static Type,
    arg_types: Vec<&'static Type>,
    thunk: Box<CtorThunk>,
}

impl AnyCtor {
    pub fn new<T, Marker>(func: impl IntoConstructor<T, Marker>) -> Self {
        func.into_constructor()
    }

    /// Type of the created objects.
    #[inline]
    pub fn ty(&self) -> &'static Type {
        self.ty
    }

    #[inline]
    pub fn arg_types(&self) -> &[&'static Type] {
        &self.arg_types
    }

    /// Checks if `args` have exactly the argument types.
    pub fn accepts(&self, args: &[Any]) -> bool {
        args.len() == self.arg_types.len()
            && args
                .iter()
                .zip(&self.arg_types)
                .all(|(arg, ty)| arg.ty() == Some(*ty))
    }

    pub fn create(&self, args: &[Any]) -> Result<BoxedObject, InvokeError> {
        (self.thunk)(args)
    }
}

impl fmt::Debug for AnyCtor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyCtor")
            .field("ty", &self.ty)
            .field("arg_types", &self.arg_types)
            .finish()
    }
}

/// Conversion of a function into an [`AnyCtor`] creating `T`.
pub trait IntoConstructor<T, Marker>: Send + Sync + 'static {
    fn into_constructor(self) -> AnyCtor;
}

#[doc(hidden)]
pub struct CtorMarker<Args>(PhantomData<fn(Args)>);

macro_rules! impl_into_constructor {
    ($count:literal $(, $arg:ident => $idx:tt)*) => {
        impl<T, Func $(, $arg)*> IntoConstructor<T, CtorMarker<($($arg,)*)>> for Func
        where
            T: Typed + Send + Sync,
            $($arg: Typed + Clone + Send + Sync,)*
            Func: Fn($($arg),*) -> T + Send + Sync + 'static,
        {
            fn into_constructor(self) -> AnyCtor {
                AnyCtor {
                    ty: T::ty(),
                    arg_types: vec![$(<$arg as Typed>::ty()),*],
                    thunk: ctor_thunk(move |args| {
                        check_count(args, $count)?;
                        Ok(BoxedObject::new((self)($(arg::<$arg>(args, $idx)?),*)))
                    }),
                }
            }
        }
    };
}

impl_into_constructor!(0);
impl_into_constructor!(1, A0 => 0);
impl_into_constructor!(2, A0 => 0, A1 => 1);
impl_into_constructor!(3, A0 => 0, A1 => 1, A2 => 2);

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::{AnyCtor, AnyFn, InvokeError, Receiver};
    use crate::info::Type;
    use crate::value::Any;

    #[test]
    fn signature_is_recorded() {
        let f = AnyFn::new(|s: &String, start: usize, end: usize| String::from(&s[start..end]));
        assert_eq!(f.receiver(), Receiver::Ref);
        assert_eq!(f.self_type(), Type::of::<String>());
        assert_eq!(f.arg_types(), &[Type::of::<usize>(), Type::of::<usize>()]);
        assert_eq!(f.return_type(), Type::of::<String>());
    }

    #[test]
    fn argument_errors() {
        let f = AnyFn::new(|v: &u32, add: u32| *v + add);

        assert_eq!(
            f.invoke(&1_u32, &[]).unwrap_err(),
            InvokeError::ArgCount { expected: 1, found: 0 }
        );
        assert!(matches!(
            f.invoke(&1_u32, &[Any::new(1_u64)]),
            Err(InvokeError::ArgType { index: 0, .. })
        ));
        assert!(matches!(
            f.invoke(&1_i32, &[Any::new(1_u32)]),
            Err(InvokeError::Receiver { .. })
        ));
        assert_eq!(
            f.invoke(&1_u32, &[Any::new(2_u32)]).unwrap().get::<u32>(),
            Some(&3)
        );
    }

    #[test]
    fn mutable_receiver() {
        let clear = AnyFn::new(|s: &mut String| s.clear());
        let mut text = String::from("abc");

        assert_eq!(clear.invoke(&text, &[]).unwrap_err(), InvokeError::ReadOnly);
        assert!(clear.invoke_mut(&mut text, &[]).unwrap().is::<()>());
        assert!(text.is_empty());
    }

    #[test]
    fn constructor_types() {
        let ctor = AnyCtor::new(|| 5_u16);
        assert_eq!(ctor.ty(), Type::of::<u16>());
        assert!(ctor.accepts(&[]));
        assert!(!ctor.accepts(&[Any::new(1_u8)]));
        assert_eq!(ctor.create(&[]).unwrap().downcast_ref::<u16>(), Some(&5));
    }
}
