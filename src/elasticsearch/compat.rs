use semver::Version;

/// Legacy mapping type name, required by Elasticsearch before 8.0.0.
pub const DOC_TYPE: &str = "_doc";

/// Versions before this one require mappings to be nested under a type name.
const TYPELESS_MAPPINGS_VERSION: Version = Version::new(7, 0, 0);
/// Versions before this one require bulk actions to carry `_type`.
const TYPELESS_ACTIONS_VERSION: Version = Version::new(8, 0, 0);

/// How requests must be shaped for a given Elasticsearch version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Compatibility {
    /// Nest the index mapping under [`DOC_TYPE`].
    pub include_type_name: bool,
    /// Add `"_type": "_doc"` to every bulk index action.
    pub include_type_discriminator: bool,
}

impl From<&Version> for Compatibility {
    fn from(version: &Version) -> Self {
        Self {
            include_type_name: version < &TYPELESS_MAPPINGS_VERSION,
            include_type_discriminator: version < &TYPELESS_ACTIONS_VERSION,
        }
    }
}
