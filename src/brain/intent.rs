//! Intent classification.
//!
//! Every inbound utterance is normalized once and then checked against an
//! ordered table of trigger vocabularies. The first category (in priority
//! order) with a matching trigger wins.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Specialized task an utterance can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntentCategory {
    ClientMessage,
    Delay,
    Summary,
    Decisions,
    Actions,
    Conflict,
    Standup,
    Taskify,
    Sales,
    Support,
    Security,
    Hiring,
    Retro,
    ScopeChange,
    Budget,
    Email,
    Whatsapp,
    Brainstorm,
    Okr,
    Training,
}

impl IntentCategory {
    /// Default priority order.
    pub const ALL: [IntentCategory; 20] = [
        Self::ClientMessage,
        Self::Delay,
        Self::Summary,
        Self::Decisions,
        Self::Actions,
        Self::Conflict,
        Self::Standup,
        Self::Taskify,
        Self::Sales,
        Self::Support,
        Self::Security,
        Self::Hiring,
        Self::Retro,
        Self::ScopeChange,
        Self::Budget,
        Self::Email,
        Self::Whatsapp,
        Self::Brainstorm,
        Self::Okr,
        Self::Training,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ClientMessage => "client-message",
            Self::Delay => "delay",
            Self::Summary => "summary",
            Self::Decisions => "decisions",
            Self::Actions => "actions",
            Self::Conflict => "conflict",
            Self::Standup => "standup",
            Self::Taskify => "taskify",
            Self::Sales => "sales",
            Self::Support => "support",
            Self::Security => "security",
            Self::Hiring => "hiring",
            Self::Retro => "retro",
            Self::ScopeChange => "scope-change",
            Self::Budget => "budget",
            Self::Email => "email",
            Self::Whatsapp => "whatsapp",
            Self::Brainstorm => "brainstorm",
            Self::Okr => "okr",
            Self::Training => "training",
        }
    }

    fn triggers(&self) -> &'static [Trigger] {
        use Trigger::{Phrase, Word};
        match self {
            Self::ClientMessage => &[
                Phrase("mensagem pro cliente"),
                Phrase("mensagem para o cliente"),
                Phrase("status pro cliente"),
                Phrase("responde o cliente"),
            ],
            Self::Delay => &[
                Phrase("explica o atraso"),
                Phrase("explicar o atraso"),
                Phrase("por que demorou"),
                Phrase("justifica a demora"),
                Phrase("atrasou"),
            ],
            Self::Summary => &[
                Phrase("resumo"),
                Phrase("resuma"),
                Phrase("resumir a reunião"),
                Word("ata"),
            ],
            Self::Decisions => &[
                Phrase("decisões"),
                Phrase("decisoes"),
                Phrase("o que foi decidido"),
            ],
            Self::Actions => &[
                Phrase("próximos passos"),
                Phrase("proximos passos"),
                Phrase("o que falta"),
                Word("ações"),
                Word("acoes"),
            ],
            Self::Conflict => &[
                Phrase("conflito"),
                Phrase("discordou"),
                Phrase("discordaram"),
                Phrase("não concordou"),
                Phrase("nao concordou"),
            ],
            Self::Standup => &[
                Phrase("standup"),
                Phrase("daily"),
                Phrase("atualização rápida"),
                Phrase("atualizacao rapida"),
            ],
            Self::Taskify => &[
                Phrase("transforma em tarefa"),
                Phrase("gera tasks"),
                Phrase("to do list"),
                Phrase("lista de tarefas"),
            ],
            Self::Sales => &[
                Phrase("proposta"),
                Phrase("orçamento pro cliente"),
                Word("demo"),
                Phrase("apresentação"),
                Phrase("venda"),
            ],
            Self::Support => &[
                Phrase("cliente reclamou"),
                Phrase("cliente bravo"),
                Phrase("ticket"),
                Phrase("suporte"),
                Phrase("erro no cliente"),
            ],
            Self::Security => &[
                Phrase("lgpd"),
                Phrase("segurança"),
                Phrase("privacidade"),
                Phrase("dados sensíveis"),
                Phrase("pode gravar"),
            ],
            Self::Hiring => &[
                Word("vaga"),
                Phrase("entrevista"),
                Phrase("candidato"),
                Phrase("contratar"),
                Phrase("recrutamento"),
            ],
            Self::Retro => &[
                Word("retro"),
                Phrase("retrospectiva"),
                Phrase("post-mortem"),
                Phrase("post mortem"),
                Phrase("lições aprendidas"),
            ],
            Self::ScopeChange => &[
                Phrase("mudança de escopo"),
                Phrase("escopo mudou"),
                Phrase("não estava no escopo"),
                Phrase("nao estava no escopo"),
            ],
            Self::Budget => &[
                Phrase("orçamento"),
                Phrase("desconto"),
                Phrase("valor do projeto"),
                Phrase("pricing"),
            ],
            Self::Email => &[
                Phrase("transforma em email"),
                Phrase("transformar em email"),
                Phrase("vira email"),
            ],
            Self::Whatsapp => &[
                Phrase("mensagem de whatsapp"),
                Phrase("whatsapp"),
                Phrase("manda no zap"),
            ],
            Self::Brainstorm => &[
                Phrase("ideias"),
                Phrase("me dá ideias"),
                Phrase("me da ideias"),
                Phrase("brainstorm"),
                Phrase("opções"),
                Phrase("opcoes"),
                Phrase("alternativas"),
            ],
            Self::Okr => &[
                Word("okr"),
                Word("okrs"),
                Phrase("metas do trimestre"),
                Phrase("objetivos e resultados"),
                Phrase("planejamento do time"),
            ],
            Self::Training => &[
                Phrase("treinamento"),
                Phrase("onboard"),
                Phrase("onboarding"),
                Phrase("apresentar pro time"),
            ],
        }
    }
}

impl fmt::Display for IntentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy)]
enum Trigger {
    /// Matches anywhere in the normalized text.
    Phrase(&'static str),
    /// Matches only on word boundaries (short words that hide inside others).
    Word(&'static str),
}

impl Trigger {
    fn matches(&self, text: &Normalized) -> bool {
        match self {
            Trigger::Phrase(phrase) => text.contains(phrase),
            Trigger::Word(word) => text.contains_word(word),
        }
    }
}

/// Lowercased, trimmed utterance plus a word-boundary view of it.
#[derive(Debug, Clone)]
pub struct Normalized {
    text: String,
    padded_words: String,
}

impl Normalized {
    pub fn new(raw: &str) -> Self {
        let text = normalize(raw);
        let padded_words = pad_words(&text);
        Self { text, padded_words }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn contains(&self, phrase: &str) -> bool {
        self.text.contains(phrase)
    }

    pub fn contains_any(&self, phrases: &[&str]) -> bool {
        phrases.iter().any(|p| self.contains(p))
    }

    pub fn contains_word(&self, phrase: &str) -> bool {
        self.padded_words.contains(&pad_words(phrase))
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.text.starts_with(prefix)
    }
}

pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// `" word word "`, punctuation folded to single spaces.
fn pad_words(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push(' ');
    for word in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        out.push_str(&word.to_lowercase());
        out.push(' ');
    }
    out
}

/// Decides which specialized category, if any, an utterance asks for.
///
/// Implementations are free to match however they like; the keyword table
/// below is the one shipped today.
pub trait IntentClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Option<IntentCategory>;
}

/// Ordered keyword table.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    order: Vec<IntentCategory>,
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self {
            order: IntentCategory::ALL.to_vec(),
        }
    }
}

impl KeywordClassifier {
    /// Builds a classifier with a custom priority order. Duplicates are
    /// dropped; categories left out keep their default relative order at
    /// the end.
    pub fn with_order(order: &[IntentCategory]) -> Self {
        let mut resolved: Vec<IntentCategory> = Vec::with_capacity(IntentCategory::ALL.len());
        for category in order.iter().chain(IntentCategory::ALL.iter()) {
            if !resolved.contains(category) {
                resolved.push(*category);
            }
        }
        Self { order: resolved }
    }

    pub fn order(&self) -> &[IntentCategory] {
        &self.order
    }

    pub fn classify_normalized(&self, text: &Normalized) -> Option<IntentCategory> {
        self.order
            .iter()
            .copied()
            .find(|category| category.triggers().iter().any(|t| t.matches(text)))
    }
}

impl IntentClassifier for KeywordClassifier {
    fn classify(&self, text: &str) -> Option<IntentCategory> {
        self.classify_normalized(&Normalized::new(text))
    }
}

const GREETINGS: &[&str] = &[
    "bom dia", "boa tarde", "boa noite", "olá", "ola", "oi", "e aí", "e ai",
];

const VAGUE_TRIGGERS: &[&str] = &[
    "ideia",
    "ideias",
    "brainstorm",
    "post",
    "título",
    "titulo",
    "legenda",
    "copy",
    "hook",
    "sugestões",
    "sugestao",
    "sugestão",
    "ajuda com",
    "o que fazer",
    "me ajuda",
    "planejar",
    "plano",
    "campanha",
    "conteúdo",
    "conteudo",
];

const RICH_CONTEXT: &[&str] = &[
    "objetivo",
    "público",
    "publico",
    "formato",
    "canal",
    "restrição",
    "restricao",
    "restricoes",
    "prazo",
    "deadline",
    "kpi",
    "critério de sucesso",
    "criterio de sucesso",
];

/// The wake word anywhere in the text counts as being addressed.
pub fn is_addressed(text: &Normalized, wake_word: &str) -> bool {
    text.contains(&normalize(wake_word))
}

pub fn is_greeting(text: &Normalized, wake_word: &str) -> bool {
    GREETINGS.iter().any(|g| text.contains_word(g))
        || text.contains_word(&format!("fala {}", normalize(wake_word)))
}

/// Any brainstorm trigger, whichever category wins classification.
pub fn is_brainstorm(text: &Normalized) -> bool {
    IntentCategory::Brainstorm
        .triggers()
        .iter()
        .any(|t| t.matches(text))
}

/// True when the request is too short or too open-ended to answer well.
pub fn needs_clarification(raw: &str, min_chars: usize) -> bool {
    let text = Normalized::new(raw);
    if text.char_len() < min_chars {
        return true;
    }
    text.contains_any(VAGUE_TRIGGERS) && !text.contains_any(RICH_CONTEXT)
}

/// Drops the leading wake word token so generators see only the request.
pub fn strip_wake_word(raw: &str, wake_word: &str) -> String {
    let trimmed = raw.trim();
    if !normalize(trimmed).starts_with(&normalize(wake_word)) {
        return trimmed.to_string();
    }
    match trimmed.split_once(char::is_whitespace) {
        Some((_, rest)) => rest.trim().to_string(),
        None => String::new(),
    }
}
