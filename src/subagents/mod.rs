pub(crate) mod analyzer;
pub(crate) mod assembler;

pub(crate) use analyzer::{ANALYZER_SYSTEM_PROMPT, build_analyze_prompt};
pub(crate) use assembler::{ASSEMBLER_SYSTEM_PROMPT, build_assemble_prompt};
