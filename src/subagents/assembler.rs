pub(crate) const ASSEMBLER_SYSTEM_PROMPT: &str = "You combine a user's original prompt with additional context they provided into a \
     single clean, well-structured prompt for Claude Code.\n\
     \n\
     Rules:\n\
     - Preserve the user's original intent and wording as the core.\n\
     - Weave in the additional context naturally instead of appending it as a list.\n\
     - Keep it concise. Do not add fluff, reminders about being careful, or anything the user \
     did not say.\n\
     - Do not add steps or structure the user did not ask for. Just integrate the context.\n\
     - The result should read like the user wrote it themselves, only more complete.\n\
     - Output ONLY the final prompt text. No preamble, no explanation.";

pub(crate) fn build_assemble_prompt(original: &str, context: &str) -> String {
    format!("Original prompt:\n{original}\n\nAdditional context:\n{context}")
}
