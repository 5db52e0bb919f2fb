use crate::{
    app::farm::{
        POINTS_PER_TOKEN,
        format_grouped,
    },
    config::USDC_DECIMALS,
};

/// A seed pack SKU. Prices are fixed in whole USDC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pack {
    One,
    Two,
    Three,
    Four,
}

impl Pack {
    pub fn all() -> [Pack; 4] {
        [Pack::One, Pack::Two, Pack::Three, Pack::Four]
    }

    /// Parses the `pack` query parameter. Anything outside 1–4 is rejected.
    pub fn from_param(raw: &str) -> Option<Pack> {
        match raw {
            "1" => Some(Pack::One),
            "2" => Some(Pack::Two),
            "3" => Some(Pack::Three),
            "4" => Some(Pack::Four),
            _ => None,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            Pack::One => 1,
            Pack::Two => 2,
            Pack::Three => 3,
            Pack::Four => 4,
        }
    }

    pub fn price_usdc(self) -> u64 {
        match self {
            Pack::One => 5,
            Pack::Two => 20,
            Pack::Three => 50,
            Pack::Four => 100,
        }
    }

    /// Price in USDC base units, the amount quoted to the aggregator.
    pub fn price_base_units(self) -> u64 {
        self.price_usdc() * 10u64.pow(USDC_DECIMALS)
    }

    /// Store menu label, showing the carrot yield rather than the price.
    pub fn store_label(self) -> String {
        let carrots = format_grouped(self.price_usdc() as f64 / POINTS_PER_TOKEN);
        format!("Pack {} ({} 🥕)", self.number(), carrots)
    }

    pub fn buy_href(self) -> String {
        format!("/api/action?scene=store&action=buy&pack={}", self.number())
    }
}
