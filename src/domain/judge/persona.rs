use std::collections::{BTreeMap, HashMap};

use tracing::debug;

pub const DEFAULT_PERSONA: &str = "default";

const DEFAULT_INSTRUCTION: &str = "You are an impartial expert evaluator. Judge the response \
fairly on accuracy, completeness, and clarity.";

/// Built-in judge personas
pub fn default_personas() -> BTreeMap<String, String> {
    let mut personas = BTreeMap::new();

    personas.insert(DEFAULT_PERSONA.to_string(), DEFAULT_INSTRUCTION.to_string());
    personas.insert(
        "strict".to_string(),
        "You are a demanding senior reviewer. Penalize any factual error, omission, or \
         unnecessary verbosity heavily; reserve high scores for flawless answers."
            .to_string(),
    );
    personas.insert(
        "lenient".to_string(),
        "You are a supportive reviewer. Reward answers that get the main point right even if \
         they are incomplete or loosely worded."
            .to_string(),
    );
    personas.insert(
        "expert".to_string(),
        "You are a domain specialist. Focus on technical correctness and depth, and ignore \
         style unless it obscures meaning."
            .to_string(),
    );

    personas
}

/// Lookup from persona name to judge instruction
#[derive(Debug, Clone)]
pub struct PersonaRegistry {
    personas: HashMap<String, String>,
}

impl PersonaRegistry {
    pub fn new<I, K, V>(personas: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            personas: personas
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Instruction for `name`, falling back to the default persona when unknown
    pub fn resolve(&self, name: &str) -> &str {
        if let Some(instruction) = self.personas.get(name) {
            return instruction;
        }

        debug!(persona = name, "Unknown judge persona, using default");

        self.personas
            .get(DEFAULT_PERSONA)
            .map(String::as_str)
            .unwrap_or(DEFAULT_INSTRUCTION)
    }
}

impl Default for PersonaRegistry {
    fn default() -> Self {
        Self::new(default_personas())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_persona() {
        let registry = PersonaRegistry::default();
        assert!(registry.resolve("strict").contains("demanding"));
    }

    #[test]
    fn test_unknown_persona_falls_back_to_default() {
        let registry = PersonaRegistry::default();
        assert_eq!(registry.resolve("pirate"), registry.resolve(DEFAULT_PERSONA));
    }

    #[test]
    fn test_fallback_without_default_entry() {
        let registry = PersonaRegistry::new([("strict", "Be harsh.")]);

        assert_eq!(registry.resolve("strict"), "Be harsh.");
        assert_eq!(registry.resolve("other"), DEFAULT_INSTRUCTION);
    }
}
