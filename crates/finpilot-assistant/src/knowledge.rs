//! Keyword-indexed knowledge store for topical grounding snippets.
//!
//! The index is read-only between loads; `load` swaps the whole vector
//! behind an `Arc` so concurrent readers never observe a partial index.

use std::path::Path;
use std::sync::{Arc, RwLock};

use serde::Deserialize;
use tracing::{info, warn};

use finpilot_core::KnowledgeEntry;

use crate::error::AssistantError;

#[derive(Deserialize)]
struct KnowledgeFile {
    #[serde(default)]
    entries: Vec<KnowledgeEntry>,
}

/// In-memory knowledge index with loose keyword retrieval.
#[derive(Default)]
pub struct KnowledgeStore {
    entries: RwLock<Arc<Vec<KnowledgeEntry>>>,
}

impl KnowledgeStore {
    /// An empty store. Retrieval returns nothing until `load` is called.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-loaded with the built-in finance entries.
    pub fn with_defaults() -> Self {
        let store = Self::new();
        store.load(default_entries());
        store
    }

    /// Replace the index with a new entry set (copy-and-swap). Entries are
    /// kept in descending priority order; readers mid-retrieval keep their
    /// snapshot.
    pub fn load(&self, mut entries: Vec<KnowledgeEntry>) {
        entries.sort_by(|a, b| b.priority.cmp(&a.priority));
        let count = entries.len();
        let mut guard = self.entries.write().unwrap_or_else(|e| e.into_inner());
        *guard = Arc::new(entries);
        info!(count, "Knowledge index loaded");
    }

    /// Load entries from a TOML file (an `[[entries]]` array of tables),
    /// replacing the current index.
    pub fn load_from_file(&self, path: &Path) -> Result<usize, AssistantError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AssistantError::Knowledge(format!("{}: {}", path.display(), e)))?;
        let file: KnowledgeFile = toml::from_str(&content)
            .map_err(|e| AssistantError::Knowledge(format!("{}: {}", path.display(), e)))?;
        if file.entries.is_empty() {
            warn!("Knowledge file {} contains no entries", path.display());
        }
        let count = file.entries.len();
        self.load(file.entries);
        Ok(count)
    }

    /// Retrieve every entry whose keywords loosely match any query keyword.
    ///
    /// Matching is case-insensitive substring containment in either
    /// direction, so "dividend" finds "dividends" and vice versa. An entry
    /// matched by several query keywords appears once per match; callers
    /// tolerate repeats. Results follow the index's priority order.
    pub fn retrieve(&self, keywords: &[String]) -> Vec<KnowledgeEntry> {
        let entries = {
            let guard = self.entries.read().unwrap_or_else(|e| e.into_inner());
            guard.clone()
        };
        let mut matched = Vec::new();
        for entry in entries.iter() {
            for keyword in keywords {
                if entry.keywords.iter().any(|k| loose_match(k, keyword)) {
                    matched.push(entry.clone());
                }
            }
        }
        matched
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn loose_match(a: &str, b: &str) -> bool {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    !a.is_empty() && !b.is_empty() && (a.contains(&b) || b.contains(&a))
}

fn entry(
    title: &str,
    category: &str,
    content: &str,
    keywords: &[&str],
    priority: i32,
) -> KnowledgeEntry {
    KnowledgeEntry {
        title: title.to_string(),
        category: category.to_string(),
        content: content.to_string(),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
        priority,
    }
}

/// The built-in finance knowledge set, used when no knowledge file is
/// configured.
pub fn default_entries() -> Vec<KnowledgeEntry> {
    vec![
        entry(
            "Dividends",
            "income",
            "A dividend is a portion of a company's earnings paid to shareholders, \
             usually quarterly. Dividend yield is the annual dividend divided by the \
             share price. Companies with long histories of rising payouts are often \
             called dividend aristocrats.",
            &["dividends", "yield", "payout", "income"],
            5,
        ),
        entry(
            "P/E ratio",
            "valuation",
            "The price-to-earnings ratio divides a company's share price by its \
             earnings per share. A high P/E can signal growth expectations or \
             overvaluation; comparisons are most meaningful within the same sector.",
            &["p/e", "pe ratio", "valuation", "earnings"],
            5,
        ),
        entry(
            "Diversification",
            "strategy",
            "Diversification spreads investments across assets, sectors, and \
             regions so that no single position dominates risk. It reduces \
             idiosyncratic risk but not market-wide risk.",
            &["diversification", "allocation", "risk"],
            4,
        ),
        entry(
            "Technical indicators",
            "analysis",
            "Technical indicators derive signals from price and volume history. \
             Moving averages smooth trend, RSI measures momentum on a 0-100 scale \
             (above 70 overbought, below 30 oversold), and MACD tracks the gap \
             between two moving averages.",
            &["technical", "rsi", "macd", "moving average", "indicators"],
            4,
        ),
        entry(
            "ETFs",
            "instruments",
            "An exchange-traded fund holds a basket of securities and trades on an \
             exchange like a single stock. Index ETFs offer broad exposure at low \
             cost and are a common building block for diversified portfolios.",
            &["etf", "etfs", "funds", "index"],
            3,
        ),
        entry(
            "Market capitalization",
            "valuation",
            "Market cap is share price multiplied by shares outstanding. Companies \
             are commonly grouped as large-cap (over $10B), mid-cap ($2-10B), and \
             small-cap (under $2B), with different risk and growth profiles.",
            &["market cap", "capitalization", "large-cap", "small-cap"],
            3,
        ),
        entry(
            "Dollar-cost averaging",
            "strategy",
            "Dollar-cost averaging invests a fixed amount at regular intervals \
             regardless of price, buying more shares when prices are low and fewer \
             when they are high. It trades timing upside for discipline.",
            &["dollar-cost averaging", "dca", "investing strategy"],
            2,
        ),
        entry(
            "Stop-loss orders",
            "orders",
            "A stop-loss order sells a position automatically when the price falls \
             to a set level, capping downside. Stop orders can execute below the \
             stop price in fast markets; stop-limit orders bound the fill price but \
             may not execute at all.",
            &["stop-loss", "stop loss", "orders", "risk management"],
            2,
        ),
    ]
}
