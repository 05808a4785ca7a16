/// How many nodes one replace call may rewrite.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReplacePolicy {
    /// Every node whose value equals the selected value.
    #[default]
    AllMatches,
    /// Only the first such node in document order.
    FirstMatch,
}

/// Per-view replace policy. Attribute views rewrite every duplicate; text
/// replacement stops at the first matching node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplaceConfig {
    pub images: ReplacePolicy,
    pub links: ReplacePolicy,
    pub text: ReplacePolicy,
}

impl Default for ReplaceConfig {
    fn default() -> Self {
        Self {
            images: ReplacePolicy::AllMatches,
            links: ReplacePolicy::AllMatches,
            text: ReplacePolicy::FirstMatch,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SaveConfig {
    /// Write to a temporary file in the target directory and rename it over the
    /// target, so a failed write never leaves a truncated document behind.
    pub atomic: bool,
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self { atomic: true }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EditorConfig {
    pub replace: ReplaceConfig,
    pub save: SaveConfig,
}
