use modshift_rewrite::is_relative;
use path_clean::PathClean;
use tracing::trace;

use super::extensions::resolve_with_extensions;
use super::{Resolution, ResolveContext, Resolver};
use crate::error::Result;

/// Resolves `./` and `../` imports against the importing module's directory
#[derive(Debug, Default, Clone, Copy)]
pub struct RelativeResolver;

impl Resolver for RelativeResolver {
    fn name(&self) -> &'static str {
        "relative"
    }

    fn resolve_module(
        &self,
        specifier: &str,
        ctx: &ResolveContext<'_>,
    ) -> Result<Option<Resolution>> {
        if !is_relative(specifier) {
            return Ok(None);
        }

        let candidate = ctx.base_dir().join(specifier).clean();
        let resolved = resolve_with_extensions(&candidate, ctx.loader);
        trace!(specifier, candidate = %candidate.display(), found = resolved.is_some(), "relative lookup");

        Ok(resolved.map(Resolution::Local))
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::*;
    use crate::loader::MemoryLoader;
    use crate::module_id::ModuleId;

    #[test]
    fn test_resolves_against_importer_directory() {
        let loader = MemoryLoader::new()
            .with_file("/p/app/odd.js", "")
            .with_file("/p/lib/util/index.js", "");
        let importer = ModuleId::new("/p/app/even.js").unwrap();
        let ctx = ResolveContext {
            root: Path::new("/p"),
            importer: &importer,
            loader: &loader,
        };

        assert_eq!(
            RelativeResolver.resolve_module("./odd", &ctx).unwrap(),
            Some(Resolution::Local(PathBuf::from("/p/app/odd.js")))
        );
        assert_eq!(
            RelativeResolver.resolve_module("../lib/util", &ctx).unwrap(),
            Some(Resolution::Local(PathBuf::from("/p/lib/util/index.js")))
        );
        assert_eq!(RelativeResolver.resolve_module("./nope", &ctx).unwrap(), None);
        assert_eq!(RelativeResolver.resolve_module("ember", &ctx).unwrap(), None);
    }
}
