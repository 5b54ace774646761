use super::types::{GenerationRequest, RequestKind};

/// The two textual artifacts of a request. The output schema travels
/// separately (see [`super::schema`]); keeping them apart means prompt
/// wording and reply shape are independently testable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptParts {
    pub system_instruction: String,
    pub user_query: String,
}

/// Fixed persona, parameterized by tone only.
fn system_instruction(tone: &str) -> String {
    format!(
        "You are a seasoned professional engaging thoughtfully on a social feed. \
         Write in a {tone} tone. Never offer generic praise or empty agreement: \
         every piece of text you produce must add a concrete insight, a relevant \
         experience, or a pointed question. Stay concise and write like a person, \
         not a brand."
    )
}

/// Build the instruction and query for a request. The literal input is
/// embedded untruncated; it is carried to the wire as structured data, so
/// quotes or markup inside it cannot corrupt the request payload.
pub fn build_prompt(request: &GenerationRequest, max_post_chars: u32) -> PromptParts {
    let user_query = match request.kind {
        RequestKind::Comment => format!(
            "Here is a post from my feed:\n\n{}\n\nPropose exactly 3 distinct \
             comment suggestions I could reply with. Each suggestion must stand \
             on its own and react to the substance of the post.",
            request.input
        ),
        RequestKind::Post => format!(
            "Write a post about the following topic: {}. Keep it under \
             {max_post_chars} characters. Open with a hook that earns the first \
             line, and end with a clear call to action.",
            request.input
        ),
    };

    PromptParts {
        system_instruction: system_instruction(&request.tone),
        user_query,
    }
}
