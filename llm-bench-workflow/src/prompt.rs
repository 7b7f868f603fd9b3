use llm_bench_core::letters::index_to_letter;
use llm_bench_core::{BenchError, Result, SampledRow, TaskKind};
use std::fmt::Write;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a knowledgeable and reliable AI assistant.\n\
Answer questions accurately, clearly, and concisely.\n\
Avoid unnecessary explanations or reasoning unless explicitly requested.";

/// Suffix for free-text prompts when the task carries no instruction.
pub const DEFAULT_FREE_TEXT_INSTRUCTION: &str = "Answer the question directly.";

/// Model input for one sampled row.
///
/// Multiple choice renders the question, an `Options:` block labelled `A)`,
/// `B)`, ... and the instruction (if any) after a blank line. Free-text kinds
/// render the question and the instruction on the next line.
pub fn build_prompt(kind: TaskKind, row: &SampledRow, instruction: Option<&str>) -> Result<String> {
    match kind {
        TaskKind::MultipleChoice => {
            let options = row.options.as_ref().ok_or_else(|| {
                BenchError::Configuration("Multiple-choice row has no options".to_string())
            })?;

            let mut prompt = format!("{}\nOptions:\n", row.question);
            for (idx, option) in options.iter().enumerate() {
                let label = index_to_letter(idx)?;
                // Writing to a String cannot fail.
                let _ = writeln!(prompt, "{}) {}", label, option);
            }
            if let Some(instruction) = instruction {
                prompt.push('\n');
                prompt.push_str(instruction);
            }
            Ok(prompt)
        }
        TaskKind::StringBased | TaskKind::PromptBased => Ok(format!(
            "{}\n{}",
            row.question,
            instruction.unwrap_or(DEFAULT_FREE_TEXT_INSTRUCTION)
        )),
    }
}
