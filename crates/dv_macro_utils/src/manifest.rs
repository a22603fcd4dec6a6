use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;

use toml_edit::{Document, Item, Table};

/// The caller's parsed `Cargo.toml`, used to emit crate paths that resolve
/// from the crate invoking a derive.
///
/// # Example
///
/// ```rust
/// # use dv_macro_utils::Manifest;
/// let p: syn::Path = Manifest::shared(|m| m.get_crate_path("dv_reflect"));
/// ```
///
/// # Resolution rules
///
/// For `dependencies`, then `dev-dependencies`:
///
/// 1. A direct dependency on `name` gives `::name`.
/// 2. A `dv_`-prefixed name reached through the facade gives
///    `::dv_core::short_name` (e.g. `dv_reflect` -> `::dv_core::reflect`),
///    or `::dv::short_name` when the facade is renamed to `dv`.
///
/// Anything else falls back to `::name`.
///
/// Library code of a crate referring to itself should keep an
/// `extern crate self as name;` alias so the absolute path also works inside it.
#[derive(Debug)]
pub struct Manifest {
    pub manifest: Document<Box<str>>,
    pub modified_time: SystemTime,
}

const ENGINE_PREFIX: &str = "dv_";
const FACADE_NAMES: [&str; 2] = ["dv_core", "dv"];

impl Manifest {
    #[inline(never)]
    fn manifest_path() -> PathBuf {
        let dir = env::var_os("CARGO_MANIFEST_DIR")
            .expect("CARGO_MANIFEST_DIR should be auto-defined by cargo.");
        let path = PathBuf::from(dir).join("Cargo.toml");
        assert!(
            path.exists(),
            "Cargo manifest does not exist at path {}",
            path.display(),
        );
        path
    }

    #[inline(never)]
    fn modified_time(path: &Path) -> std::io::Result<SystemTime> {
        std::fs::metadata(path)?.modified()
    }

    #[inline(never)]
    fn read(path: &Path) -> Document<Box<str>> {
        let text = std::fs::read_to_string(path)
            .unwrap_or_else(|_| panic!("Unable to read cargo manifest: {}", path.display()));
        Document::parse(text.into_boxed_str())
            .unwrap_or_else(|_| panic!("Failed to parse cargo manifest: {}", path.display()))
    }

    fn path_of(segments: &[&str]) -> syn::Path {
        let text = segments.iter().fold(String::new(), |mut acc, seg| {
            acc.push_str("::");
            acc.push_str(seg);
            acc
        });
        syn::parse_str(&text)
            .unwrap_or_else(|_| panic!("`{text}` is not a valid path"))
    }

    fn resolve_in(deps: &Table, name: &str) -> Option<syn::Path> {
        if deps.contains_key(name) {
            return Some(Self::path_of(&[name]));
        }
        let module = name.strip_prefix(ENGINE_PREFIX)?;
        FACADE_NAMES
            .into_iter()
            .find(|facade| deps.contains_key(facade))
            .map(|facade| Self::path_of(&[facade, module]))
    }

    /// Returns the [`syn::Path`] under which `name` is visible from the
    /// calling crate. See the type level documentation for the rules.
    #[inline(never)]
    pub fn get_crate_path(&self, name: &str) -> syn::Path {
        ["dependencies", "dev-dependencies"]
            .iter()
            .find_map(|section| match self.manifest.get(section) {
                Some(Item::Table(deps)) => Self::resolve_in(deps, name),
                _ => None,
            })
            .unwrap_or_else(|| Self::path_of(&[name]))
    }

    /// Runs `func` with the caller's manifest.
    ///
    /// Parsed manifests are cached per path and refreshed when the file's
    /// modification time changes. The call still takes a lock, so a derive
    /// should resolve its paths once and pass them around.
    pub fn shared<R>(func: impl FnOnce(&Self) -> R) -> R {
        static MANIFESTS: RwLock<BTreeMap<PathBuf, Manifest>> = RwLock::new(BTreeMap::new());

        let path = Self::manifest_path();
        let modified_time =
            Self::modified_time(&path).expect("The Cargo.toml should have a modified time.");

        {
            let cache = MANIFESTS.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(manifest) = cache.get(&path)
                && manifest.modified_time == modified_time
            {
                return func(manifest);
            }
        }

        let manifest = Manifest {
            manifest: Self::read(&path),
            modified_time,
        };
        let result = func(&manifest);

        MANIFESTS
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path, manifest);

        result
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use toml_edit::{Document, Item};

    use super::Manifest;

    fn render(path: &syn::Path) -> String {
        path.segments
            .iter()
            .map(|seg| seg.ident.to_string())
            .collect::<Vec<_>>()
            .join("::")
    }

    fn deps(text: &str) -> toml_edit::Table {
        let doc = Document::parse(text).unwrap();
        match doc.get("dependencies") {
            Some(Item::Table(table)) => table.clone(),
            _ => panic!("missing [dependencies]"),
        }
    }

    #[test]
    fn direct_dependency_wins() {
        let table = deps("[dependencies]\ndv_reflect = \"0.1\"\ndv_core = \"0.1\"\n");
        let path = Manifest::resolve_in(&table, "dv_reflect").unwrap();
        assert_eq!(render(&path), "dv_reflect");
    }

    #[test]
    fn facade_dependency() {
        let table = deps("[dependencies]\ndv_core = \"0.1\"\n");
        let path = Manifest::resolve_in(&table, "dv_reflect").unwrap();
        assert_eq!(render(&path), "dv_core::reflect");
        assert!(Manifest::resolve_in(&table, "serde").is_none());
    }
}
