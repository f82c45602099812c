//! Conversation model for the chat concierge.
//!
//! A [`Conversation`] is the canonical record of one visitor session: the
//! fixed system instruction plus the accumulated user/model turns. The Gemini
//! REST API is stateless, so this value is what gets replayed on every call.

/// Persona and behavioral rules for the site assistant. Attached once when a
/// session is created and never mutated afterwards.
pub const SYSTEM_INSTRUCTION: &str = "Eres el asistente virtual de una agencia de diseño web. \
Respondes siempre en español, con un tono cercano y profesional. \
Conoces los servicios de la agencia: diseño y desarrollo de sitios web, tiendas online, \
posicionamiento SEO y mantenimiento. \
Respondes de forma breve, en dos o tres frases como máximo. \
Si el visitante pide un presupuesto o algo que no sabes, invítale a dejar sus datos \
en el formulario de contacto. Nunca inventes precios ni plazos.";

/// Scripted opening exchange that establishes the persona tone before any
/// real visitor turn is sent.
pub const OPENING_USER_TURN: &str = "Hola";
pub const OPENING_MODEL_TURN: &str =
    "¡Hola! Soy el asistente virtual de la agencia. ¿En qué puedo ayudarte?";

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Model,
}

/// A single turn in a conversation.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub role: Role,
    pub text: String,
}

/// One ongoing conversation with the external model.
#[derive(Debug, Clone)]
pub struct Conversation {
    /// Fixed priming text, set at creation.
    pub system_instruction: String,

    /// Accumulated turns, oldest first.
    pub turns: Vec<ChatTurn>,
}

impl Conversation {
    /// A fresh conversation primed with the system instruction and the
    /// scripted opening exchange.
    pub fn seeded() -> Self {
        Self {
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            turns: vec![
                ChatTurn {
                    role: Role::User,
                    text: OPENING_USER_TURN.to_string(),
                },
                ChatTurn {
                    role: Role::Model,
                    text: OPENING_MODEL_TURN.to_string(),
                },
            ],
        }
    }

    /// Record a completed request/response pair.
    pub fn push_exchange(&mut self, user_text: &str, model_text: &str) {
        self.turns.push(ChatTurn {
            role: Role::User,
            text: user_text.to_string(),
        });
        self.turns.push(ChatTurn {
            role: Role::Model,
            text: model_text.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_conversation_carries_opening_exchange() {
        let conversation = Conversation::seeded();

        assert_eq!(conversation.system_instruction, SYSTEM_INSTRUCTION);
        assert_eq!(conversation.turns.len(), 2);
        assert_eq!(conversation.turns[0].role, Role::User);
        assert_eq!(conversation.turns[0].text, OPENING_USER_TURN);
        assert_eq!(conversation.turns[1].role, Role::Model);
        assert_eq!(conversation.turns[1].text, OPENING_MODEL_TURN);
    }

    #[test]
    fn push_exchange_appends_in_order() {
        let mut conversation = Conversation::seeded();
        conversation.push_exchange("¿Hacéis tiendas online?", "Sí, trabajamos con tiendas online.");

        assert_eq!(conversation.turns.len(), 4);
        assert_eq!(conversation.turns[2].role, Role::User);
        assert_eq!(conversation.turns[3].role, Role::Model);
    }
}
