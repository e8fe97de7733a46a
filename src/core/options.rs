//! Supported fiat currencies and crypto assets

/// A fiat currency the user can price an investment in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CurrencyOption {
    /// Lowercase three letter code, as used by the price service.
    pub abbreviation: &'static str,
    /// Glyph shown next to amounts typed by the user.
    pub symbol: &'static str,
}

/// A crypto asset the user can check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CryptoOption {
    /// Asset slug, as used by the price service.
    pub id: &'static str,
    pub symbol: &'static str,
}

pub const CURRENCIES: &[CurrencyOption] = &[
    CurrencyOption {
        abbreviation: "usd",
        symbol: "$",
    },
    CurrencyOption {
        abbreviation: "eur",
        symbol: "€",
    },
    CurrencyOption {
        abbreviation: "jpy",
        symbol: "¥",
    },
    CurrencyOption {
        abbreviation: "gbp",
        symbol: "£",
    },
    CurrencyOption {
        abbreviation: "chf",
        symbol: "Fr",
    },
    CurrencyOption {
        abbreviation: "cad",
        symbol: "C$",
    },
    CurrencyOption {
        abbreviation: "aud",
        symbol: "A$",
    },
    CurrencyOption {
        abbreviation: "zar",
        symbol: "R",
    },
];

pub const CRYPTOS: &[CryptoOption] = &[
    CryptoOption {
        id: "bitcoin",
        symbol: "btc",
    },
    CryptoOption {
        id: "ethereum",
        symbol: "eth",
    },
    CryptoOption {
        id: "bitcoin-cash",
        symbol: "bch",
    },
];

impl CurrencyOption {
    /// Looks up a currency by its code, ignoring case and surrounding whitespace.
    pub fn find(code: &str) -> Option<&'static CurrencyOption> {
        let code = code.trim();
        CURRENCIES
            .iter()
            .find(|c| c.abbreviation.eq_ignore_ascii_case(code))
    }

    /// Removes the longest matching currency glyph from the start of `text`.
    pub fn strip_symbol(text: &str) -> &str {
        CURRENCIES
            .iter()
            .filter(|c| text.starts_with(c.symbol))
            .max_by_key(|c| c.symbol.len())
            .map_or(text, |c| text[c.symbol.len()..].trim_start())
    }
}

impl CryptoOption {
    /// Looks up an asset by slug, falling back to its ticker symbol.
    pub fn find(id_or_symbol: &str) -> Option<&'static CryptoOption> {
        let key = id_or_symbol.trim();
        CRYPTOS
            .iter()
            .find(|c| c.id.eq_ignore_ascii_case(key))
            .or_else(|| CRYPTOS.iter().find(|c| c.symbol.eq_ignore_ascii_case(key)))
    }
}
