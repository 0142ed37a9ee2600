//! The full outcome of one NLU turn.

use serde_json::{Map, Number, Value};

use super::turn_item::TurnItem;

/// Structured result of one NLU request.
///
/// Items are consumed once by the dispatch sequencer; action and contexts
/// drive the multi-turn flows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnResult {
    /// Plain fallback text returned by the agent.
    pub fulfillment_text: String,

    /// Ordered reply items.
    pub items: Vec<TurnItem>,

    /// Action name of the matched intent, if any.
    pub action: Option<String>,

    /// Active output contexts, most relevant first.
    pub output_contexts: Vec<OutputContext>,

    /// Parameters extracted for the matched intent.
    pub parameters: Map<String, Value>,
}

impl TurnResult {
    /// Creates a result that only carries reply items.
    pub fn with_items(items: Vec<TurnItem>) -> Self {
        Self {
            items,
            ..Default::default()
        }
    }

    /// Action name, treating an empty string as no action.
    pub fn action(&self) -> Option<&str> {
        self.action.as_deref().filter(|action| !action.is_empty())
    }

    /// The first output context, which multi-turn flows key on.
    pub fn primary_context(&self) -> Option<&OutputContext> {
        self.output_contexts.first()
    }

    pub fn has_items(&self) -> bool {
        !self.items.is_empty()
    }
}

/// An NLU output context and the parameters collected in it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputContext {
    /// Full context name, e.g. `projects/p/agent/sessions/s/contexts/job-application`.
    pub name: String,

    pub lifespan_count: u32,

    /// `None` when the context carries no parameters at all.
    pub parameters: Option<Map<String, Value>>,
}

impl OutputContext {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    /// Substring match on the context name.
    pub fn name_contains(&self, fragment: &str) -> bool {
        self.name.contains(fragment)
    }

    pub fn has_parameters(&self) -> bool {
        self.parameters.is_some()
    }

    /// A parameter rendered as text.
    ///
    /// Strings are taken as is, numbers and booleans are rendered (whole
    /// numbers without a fraction). Empty strings, nulls, lists and objects
    /// count as absent.
    pub fn text_param(&self, key: &str) -> Option<String> {
        match self.parameters.as_ref()?.get(key)? {
            Value::String(value) if !value.is_empty() => Some(value.clone()),
            Value::Number(number) => Some(render_number(number)),
            Value::Bool(flag) => Some(flag.to_string()),
            _ => None,
        }
    }
}

fn render_number(number: &Number) -> String {
    // Dialogflow sends @sys.number values as floats, so 3 arrives as 3.0.
    match number.as_f64() {
        Some(value) if number.is_f64() && value.fract() == 0.0 && value.abs() < 1e15 => {
            (value as i64).to_string()
        }
        _ => number.to_string(),
    }
}
