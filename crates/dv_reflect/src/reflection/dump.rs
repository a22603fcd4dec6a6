use alloc::format;
use alloc::string::{String, ToString};
use core::any::Any as DynAny;
use core::fmt::{self, Write};

use crate::info::Type;
use crate::reflection::Reflection;
use crate::registry::TypeTraitPrint;
use crate::value::Receiver;

const KEY_WIDTH: usize = 30;
const VALUE_WIDTH: usize = 25;

impl Reflection<'_> {
    /// Writes the value tree below this view, one line per value.
    ///
    /// Each line reads `name = value (type)`. Nodes with children are marked
    /// `[-]` when expanded and `[+]` when deeper than `max_level`. Values
    /// without a [`TypeTraitPrint`] show as `???`, pointers show the address
    /// they point to.
    ///
    /// # Examples
    ///
    /// ```
    /// use dv_reflect::{Reflection, TypeDb};
    /// use dv_reflect::derive::Reflected;
    ///
    /// #[derive(Reflected, Clone)]
    /// struct Size {
    ///     w: u32,
    ///     h: u32,
    /// }
    ///
    /// let mut db = TypeDb::new();
    /// db.register::<Size>().unwrap();
    ///
    /// let size = Size { w: 4, h: 3 };
    /// let mut out = String::new();
    /// Reflection::create_const(&db, &size).dump(&mut out, 1).unwrap();
    ///
    /// let lines: Vec<_> = out.lines().collect();
    /// assert!(lines[0].starts_with("[-] this"));
    /// assert!(lines[1].starts_with("├──     w"));
    /// assert!(lines[2].starts_with("└──     h"));
    /// assert!(lines[2].ends_with("(u32)"));
    /// ```
    pub fn dump<W: Write + ?Sized>(&self, out: &mut W, max_level: usize) -> fmt::Result {
        self.dump_node(out, "", "", "this", 0, max_level)
    }

    fn dump_node<W: Write + ?Sized>(
        &self,
        out: &mut W,
        line_prefix: &str,
        child_prefix: &str,
        key: &str,
        level: usize,
        max_level: usize,
    ) -> fmt::Result {
        let expandable = self.has_fields();
        let expand = expandable && level < max_level;
        let marker = match (expandable, expand) {
            (false, _) => "   ",
            (true, true) => "[-]",
            (true, false) => "[+]",
        };
        let ty = self.value_type().map_or("<invalid>", Type::name);

        writeln!(
            out,
            "{line_prefix}{marker} {key:<kw$} = {value:<vw$} ({ty})",
            value = self.value_string(),
            kw = KEY_WIDTH,
            vw = VALUE_WIDTH,
        )?;
        if !expand {
            return Ok(());
        }

        let fields = self.get_fields();
        let last = fields.len().saturating_sub(1);
        for (index, field) in fields.iter().enumerate() {
            let (branch, indent) = if index == last {
                ("└── ", "    ")
            } else {
                ("├── ", "│   ")
            };
            field.reflection.dump_node(
                out,
                &format!("{child_prefix}{branch}"),
                &format!("{child_prefix}{indent}"),
                &field.key.to_string(),
                level + 1,
                max_level,
            )?;
        }
        Ok(())
    }

    fn value_string(&self) -> String {
        let Some(ty) = self.value_type() else {
            return String::from("__invalid__");
        };

        if let Some(fns) = ty.deref_fns() {
            // Read in place: a copy would point somewhere else.
            return self
                .with_stored(|object| {
                    let target = fns.get(object)?;
                    let address = target as *const dyn DynAny as *const () as usize;
                    Some(format!("0x{address:08x}"))
                })
                .flatten()
                .unwrap_or_else(|| String::from("???"));
        }

        self.db()
            .get_type_trait::<TypeTraitPrint>(ty.id())
            .and_then(|print| self.visit_value(|object| print.print(object)))
            .flatten()
            .unwrap_or_else(|| String::from("???"))
    }

    /// Writes one `fn name(receiver, args) -> ret` line per method.
    pub fn dump_methods<W: Write + ?Sized>(&self, out: &mut W) -> fmt::Result {
        for method in self.get_methods() {
            let func = method.func();
            let receiver = match func.receiver() {
                Receiver::Ref => "&self",
                Receiver::Mut => "&mut self",
            };
            write!(out, "fn {}({receiver}", method.name())?;
            for arg in func.arg_types() {
                write!(out, ", {}", arg.name())?;
            }
            out.write_char(')')?;
            if !func.return_type().is::<()>() {
                write!(out, " -> {}", func.return_type().name())?;
            }
            out.write_char('\n')?;
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::format;
    use alloc::string::String;
    use alloc::vec::Vec;

    use crate::derive::Typed;
    use crate::reflection::Reflection;
    use crate::registry::{ReflectionRegistrator, TypeDb};

    #[derive(Typed, Clone)]
    struct Inner {
        value: i32,
    }

    #[derive(Typed, Clone)]
    struct Outer {
        inner: Inner,
        name: String,
        boxed: Box<i32>,
    }

    #[derive(Typed, Clone)]
    struct Opaque;

    fn db() -> TypeDb {
        let mut db = TypeDb::new();
        ReflectionRegistrator::<Inner>::begin(&mut db)
            .field("value", |i| &i.value, |i| &mut i.value)
            .method("get", |i: &Inner| i.value)
            .method("set", |i: &mut Inner, v: i32| i.value = v)
            .end()
            .unwrap();
        ReflectionRegistrator::<Outer>::begin(&mut db)
            .field("inner", |o| &o.inner, |o| &mut o.inner)
            .field("name", |o| &o.name, |o| &mut o.name)
            .field("boxed", |o| &o.boxed, |o| &mut o.boxed)
            .end()
            .unwrap();
        db.register_type::<Opaque>();
        db
    }

    fn outer() -> Outer {
        Outer {
            inner: Inner { value: 3 },
            name: String::from("x"),
            boxed: Box::new(5),
        }
    }

    fn dump(view: &Reflection<'_>, max_level: usize) -> String {
        let mut out = String::new();
        view.dump(&mut out, max_level).unwrap();
        out
    }

    #[test]
    fn collapsed_and_expanded() {
        let db = db();
        let value = outer();
        let view = Reflection::create_const(&db, &value);

        let out = dump(&view, 1);
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("[-] this"));
        assert!(lines[0].ends_with("(Outer)"));
        assert!(lines[1].starts_with("├── [+] inner"));
        assert!(lines[2].starts_with("├──     name"));
        assert!(lines[2].contains("= x "));
        assert!(lines[3].starts_with("└──     boxed"));

        let out = dump(&view, 2);
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[1].starts_with("├── [-] inner"));
        assert!(lines[2].starts_with("│   └──     value"));
        assert!(lines[2].contains("= 3 "));

        assert!(dump(&view, 0).starts_with("[+] this"));
    }

    #[test]
    fn pointer_shows_pointee_address() {
        let db = db();
        let value = outer();
        let view = Reflection::create_const(&db, &value);

        let expected = format!("0x{:08x}", &*value.boxed as *const i32 as usize);
        let out = dump(&view.get_field("boxed"), 0);
        assert!(out.contains(&expected));
    }

    #[test]
    fn fallbacks() {
        let db = db();
        let value = Opaque;
        let out = dump(&Reflection::create_const(&db, &value), 3);
        assert!(out.contains("= ???"));

        let out = dump(&Reflection::invalid(&db), 3);
        assert!(out.contains("= __invalid__"));
        assert!(out.ends_with("(<invalid>)\n"));
    }

    #[test]
    fn method_signatures() {
        let db = db();
        let value = outer();
        let view = Reflection::create_const(&db, &value);

        let mut out = String::new();
        view.get_field("inner").dump_methods(&mut out).unwrap();
        assert_eq!(out, "fn get(&self) -> i32\nfn set(&mut self, i32)\n");
    }
}
