use async_trait::async_trait;
use chrono::Datelike;

use crate::traits::AdvisoryService;
use crate::types::{DailyTip, Moderation};

/// Self-contained advisor: rotates a curated tip list by day of year and
/// moderates comments against a term blocklist.
#[derive(Clone, Debug)]
pub struct LocalAdvisor {
    tips: Vec<DailyTip>,
    blocked_terms: Vec<String>,
    day_override: Option<u32>,
}

impl LocalAdvisor {
    pub fn new(tips: Vec<DailyTip>, blocked_terms: Vec<String>) -> Self {
        Self {
            tips,
            blocked_terms: blocked_terms.into_iter().map(|t| t.to_lowercase()).collect(),
            day_override: None,
        }
    }

    /// Pin the day of year (zero-based) used for tip rotation.
    pub fn on_day(mut self, ordinal0: u32) -> Self {
        self.day_override = Some(ordinal0);
        self
    }

    fn today(&self) -> u32 {
        self.day_override
            .unwrap_or_else(|| chrono::Local::now().ordinal0())
    }

    /// The tip for a given zero-based day of year.
    pub fn tip_for_day(&self, ordinal0: u32) -> Option<DailyTip> {
        if self.tips.is_empty() {
            return None;
        }
        Some(self.tips[ordinal0 as usize % self.tips.len()].clone())
    }

    /// Classify without awaiting; the rules are purely local.
    pub fn moderate(&self, text: &str) -> Moderation {
        let normalized = text.trim().to_lowercase();
        if normalized.is_empty() {
            return Moderation::unsafe_because("Comentário vazio.");
        }
        match self
            .blocked_terms
            .iter()
            .find(|term| normalized.contains(term.as_str()))
        {
            Some(term) => Moderation::unsafe_because(format!("Linguagem inadequada: \"{term}\".")),
            None => Moderation::safe(),
        }
    }
}

impl Default for LocalAdvisor {
    fn default() -> Self {
        Self::new(default_tips(), default_blocked_terms())
    }
}

#[async_trait]
impl AdvisoryService for LocalAdvisor {
    async fn fetch_daily_tip(&self) -> Option<DailyTip> {
        self.tip_for_day(self.today())
    }

    async fn classify_comment(&self, text: &str) -> Moderation {
        self.moderate(text)
    }
}

/// Advisor with nothing to say: no tips, and every comment passes.
#[derive(Clone, Copy, Debug, Default)]
pub struct OfflineAdvisor;

#[async_trait]
impl AdvisoryService for OfflineAdvisor {
    async fn fetch_daily_tip(&self) -> Option<DailyTip> {
        None
    }

    async fn classify_comment(&self, _text: &str) -> Moderation {
        Moderation::safe()
    }
}

fn default_tips() -> Vec<DailyTip> {
    vec![
        DailyTip::new(
            "Separe 20% de tudo que você recebe antes de gastar: poupar primeiro é o hábito que sustenta todos os outros.",
        )
        .with_source("Regra 50-30-20", "https://escoladesabedoria.org/regra-50-30-20"),
        DailyTip::new(
            "Juros compostos premiam quem começa cedo. Pouco dinheiro investido por muito tempo supera muito dinheiro investido por pouco tempo.",
        )
        .with_source(
            "Cidadania Financeira - Banco Central do Brasil",
            "https://www.bcb.gov.br/cidadaniafinanceira",
        ),
        DailyTip::new(
            "Antes de uma compra por impulso, espere 24 horas. Se ainda fizer sentido amanhã, provavelmente é uma necessidade.",
        ),
        DailyTip::new(
            "Anote cada gasto durante uma semana. Você não consegue administrar aquilo que não enxerga.",
        ),
    ]
}

fn default_blocked_terms() -> Vec<String> {
    ["idiota", "burro", "otário", "lixo", "golpe garantido", "pix fácil"]
        .into_iter()
        .map(String::from)
        .collect()
}
