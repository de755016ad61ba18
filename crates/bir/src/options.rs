// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Lowering configuration.

/// Knobs for [`gen_bir_with_options`](crate::gen_bir_with_options).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BirGenOptions {
    /// Function that becomes the package entry point.
    pub entry_function: String,
    /// Block ids are `<prefix><number>`.
    pub block_id_prefix: String,
    /// Run the structural verifier on every lowered function.
    pub verify: bool,
}

impl Default for BirGenOptions {
    fn default() -> Self {
        Self {
            entry_function: "main".to_string(),
            block_id_prefix: "bb".to_string(),
            verify: true,
        }
    }
}
