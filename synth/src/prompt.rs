//! Prompt construction.

use docgraph_core::ConversationTurn;
use docgraph_extract::ExtractedText;
use serde::{Deserialize, Serialize};

const INSTRUCTIONS: &str = "\
You turn source material into a hierarchical knowledge graph for a mind map.

Rules:
1. Pick one central topic as the single root node.
2. Branch from the root into the main sub-topics, then into supporting details.
3. Keep every label short (a few words) and specific.
4. Give every node a unique id.
5. Set `parent` to the id of the node's direct parent. The root's `parent` is null.
6. Add one edge from each parent (`source`) to each child (`target`).
7. Every node must be reachable from the root. Do not create cycles.";

/// Everything the model sees for one synthesis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SynthesisRequest {
    /// The user's original question.
    #[serde(default)]
    pub question: Option<String>,

    /// Prior conversation turns, oldest first.
    #[serde(default)]
    pub history: Vec<ConversationTurn>,

    /// The answer to map; dominates the documents when present.
    #[serde(default)]
    pub answer: Option<String>,

    /// Extracted text of the uploaded documents.
    #[serde(default)]
    pub documents: Vec<ExtractedText>,
}

impl SynthesisRequest {
    /// Create a request over the given documents.
    pub fn new(documents: Vec<ExtractedText>) -> Self {
        Self {
            documents,
            ..Self::default()
        }
    }

    /// Set the original question.
    pub fn with_question(mut self, question: impl Into<String>) -> Self {
        self.question = Some(question.into());
        self
    }

    /// Set the prior conversation.
    pub fn with_history(mut self, history: Vec<ConversationTurn>) -> Self {
        self.history = history;
        self
    }

    /// Set the answer to map.
    pub fn with_answer(mut self, answer: impl Into<String>) -> Self {
        self.answer = Some(answer.into());
        self
    }
}

/// Build the prompt text.
///
/// Sections appear in a fixed order (question, conversation, answer,
/// documents); blank sections are left out.
pub fn build_prompt(request: &SynthesisRequest) -> String {
    let mut prompt = String::from(INSTRUCTIONS);

    if let Some(question) = non_blank(request.question.as_deref()) {
        prompt.push_str("\n\nOriginal question:\n");
        prompt.push_str(question);
    }

    if !request.history.is_empty() {
        prompt.push_str("\n\nConversation so far:");
        for turn in &request.history {
            prompt.push('\n');
            prompt.push_str(&turn.render());
        }
    }

    if let Some(answer) = non_blank(request.answer.as_deref()) {
        prompt.push_str(
            "\n\nAnswer to map (primary source; build the graph around it and use the \
             documents only for supporting detail):\n",
        );
        prompt.push_str(answer);
    }

    if !request.documents.is_empty() {
        prompt.push_str("\n\nDocuments:");
        for document in &request.documents {
            prompt.push_str(&format!("\n\n--- {} ---\n", document.source_name));
            if document.text.trim().is_empty() {
                prompt.push_str("(no text could be extracted)");
            } else {
                prompt.push_str(&document.text);
            }
        }
    }

    prompt
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}
