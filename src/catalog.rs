//! Trending-token catalog
//!
//! The Loading phase waits on this. Tokens arrive as the trending feed's JSON
//! array; only entries with a positive price are playable.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Market data attached to a token
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketData {
    pub price: f64,
    #[serde(rename = "marketCap")]
    pub market_cap_usd: f64,
    #[serde(rename = "priceChange1h")]
    pub price_change_1h_pct: f64,
    #[serde(rename = "priceChange24h")]
    pub price_change_24h_pct: f64,
    #[serde(rename = "volume24h")]
    pub volume_24h_usd: f64,
}

/// Social stats for the token's creator (only present when enrichment ran)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialStats {
    pub followers: Option<u64>,
    pub following: Option<u64>,
    pub bio: Option<String>,
}

/// A collectible's payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenDescriptor {
    pub id: u64,
    pub name: String,
    pub symbol: String,
    #[serde(rename = "img_url", default)]
    pub image_url: String,
    #[serde(rename = "username", default)]
    pub creator_handle: String,
    #[serde(rename = "marketData")]
    pub market_data: Option<MarketData>,
    #[serde(rename = "neynarData", default, skip_serializing_if = "Option::is_none")]
    pub social: Option<SocialStats>,
}

impl TokenDescriptor {
    /// Tradeable tokens have market data with a positive price
    pub fn is_playable(&self) -> bool {
        self.market_data.as_ref().is_some_and(|m| m.price > 0.0)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error("token feed unavailable: {0}")]
    Unavailable(String),
    #[error("token feed malformed: {0}")]
    Malformed(String),
    #[error("token feed has no playable tokens")]
    Empty,
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        CatalogError::Malformed(e.to_string())
    }
}

/// Ordered set of playable tokens
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenCatalog {
    tokens: Vec<Arc<TokenDescriptor>>,
}

impl TokenCatalog {
    /// Build from descriptors, keeping playable ones in order up to `limit`
    pub fn new(tokens: Vec<TokenDescriptor>, limit: usize) -> Result<Self, CatalogError> {
        let tokens: Vec<_> = tokens
            .into_iter()
            .filter(TokenDescriptor::is_playable)
            .take(limit)
            .map(Arc::new)
            .collect();
        if tokens.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(Self { tokens })
    }

    /// Parse the trending feed
    pub fn from_trending_json(json: &str, limit: usize) -> Result<Self, CatalogError> {
        let tokens: Vec<TokenDescriptor> = serde_json::from_str(json)?;
        let catalog = Self::new(tokens, limit)?;
        log::info!("Loaded {} trending tokens", catalog.len());
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[Arc<TokenDescriptor>] {
        &self.tokens
    }

    /// Uniform pick from a random value in [0, 1)
    pub fn pick(&self, r: f32) -> Option<Arc<TokenDescriptor>> {
        if self.tokens.is_empty() {
            return None;
        }
        let last = self.tokens.len() - 1;
        let idx = ((r * self.tokens.len() as f32).floor() as usize).min(last);
        Some(Arc::clone(&self.tokens[idx]))
    }
}
