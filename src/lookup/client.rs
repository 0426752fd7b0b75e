use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::LookupConfig;
use crate::lookup::{LookupError, Product};

const API_KEY_HEADER: &str = "X-API-Key";

/// Sort order of search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    PriceAsc,
    PriceDesc,
    NameAsc,
    NameDesc,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::PriceAsc => "price_asc",
            SortKey::PriceDesc => "price_desc",
            SortKey::NameAsc => "name_asc",
            SortKey::NameDesc => "name_desc",
        }
    }
}

/// Product name search with paging and optional filters.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductQuery {
    pub search: String,
    pub page: u32,
    pub size: u32,
    pub sort: SortKey,
    pub unique: Option<bool>,
    pub vendor: Option<String>,
    pub brand: Option<String>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
}

impl ProductQuery {
    pub fn new(search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            page: 1,
            size: 10,
            sort: SortKey::default(),
            unique: None,
            vendor: None,
            brand: None,
            price_min: None,
            price_max: None,
        }
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = Some(unique);
        self
    }

    /// Query string pairs in wire format. Absent filters are left out.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("search", self.search.clone()),
            ("page", self.page.to_string()),
            ("size", self.size.to_string()),
            ("sort", self.sort.as_str().to_string()),
        ];
        if let Some(unique) = self.unique {
            params.push(("unique", unique.to_string()));
        }
        if let Some(vendor) = &self.vendor {
            params.push(("vendor", vendor.clone()));
        }
        if let Some(brand) = &self.brand {
            params.push(("brand", brand.clone()));
        }
        if let Some(min) = self.price_min {
            params.push(("price_min", min.to_string()));
        }
        if let Some(max) = self.price_max {
            params.push(("price_max", max.to_string()));
        }
        params
    }
}

/// Anything that can answer product searches.
pub trait ProductSource {
    fn search_products(&self, query: &ProductQuery) -> Result<Vec<Product>, LookupError>;
}

#[derive(Debug, Deserialize)]
struct ProductListResponse {
    #[serde(default)]
    data: Vec<WireProduct>,
}

#[derive(Debug, Deserialize)]
struct ProductResponse {
    data: WireProduct,
}

#[derive(Debug, Deserialize)]
struct EanResponse {
    data: EanData,
}

/// Barcode lookups answer with one entry per store carrying the product.
#[derive(Debug, Deserialize)]
struct EanData {
    ean: String,
    #[serde(default)]
    products: Vec<WireProduct>,
}

impl EanData {
    fn into_products(self) -> Vec<Product> {
        let ean = self.ean;
        self.products
            .into_iter()
            .filter_map(WireProduct::into_product)
            .map(|mut p| {
                p.ean.get_or_insert_with(|| ean.clone());
                p
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct WireProduct {
    id: u64,
    name: String,
    current_price: Option<f64>,
    vendor: Option<String>,
    brand: Option<String>,
    ean: Option<String>,
}

impl WireProduct {
    fn into_product(self) -> Option<Product> {
        let price = self.current_price?;
        Some(Product {
            external_id: self.id,
            name: self.name,
            current_price: price,
            vendor: self.vendor,
            brand: self.brand,
            ean: self.ean,
        })
    }
}

/// Blocking client for the grocery price API.
#[derive(Debug, Clone)]
pub struct PriceLookupClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl PriceLookupClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LookupError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LookupError::Configuration("missing API key".to_string()));
        }
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LookupError::Configuration(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn from_config(config: &LookupConfig) -> Result<Self, LookupError> {
        Self::new(
            config.base_url.clone(),
            config.api_key.clone(),
            Duration::from_millis(config.timeout_ms.max(1)),
        )
    }

    /// Fetch one product by its catalog id. Unknown ids give `None`.
    pub fn product_by_id(&self, id: u64) -> Result<Option<Product>, LookupError> {
        let url = format!("{}/products/id/{}", self.base_url, id);
        match self.get_json::<ProductResponse>(&url, &[]) {
            Ok(response) => Ok(response.data.into_product()),
            Err(LookupError::Status(404)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Every priced offer of the product with barcode `ean`.
    pub fn product_by_ean(&self, ean: &str) -> Result<Vec<Product>, LookupError> {
        let ean = ean.trim();
        if ean.is_empty() || !ean.chars().all(|c| c.is_ascii_digit()) {
            return Err(LookupError::InvalidEan(ean.to_string()));
        }
        let url = format!("{}/products/ean/{}", self.base_url, ean);
        match self.get_json::<EanResponse>(&url, &[]) {
            Ok(response) => Ok(response.data.into_products()),
            Err(LookupError::Status(404)) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<T, LookupError> {
        debug!(url, "Price lookup request");
        let response = self
            .http
            .get(url)
            .header(API_KEY_HEADER, self.api_key.as_str())
            .query(params)
            .send()
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), url, "Price lookup failed");
            return Err(LookupError::Status(status.as_u16()));
        }

        response
            .json::<T>()
            .map_err(|e| LookupError::Decode(e.to_string()))
    }
}

impl ProductSource for PriceLookupClient {
    fn search_products(&self, query: &ProductQuery) -> Result<Vec<Product>, LookupError> {
        let url = format!("{}/products", self.base_url);
        let response: ProductListResponse = self.get_json(&url, &query.to_params())?;
        let total = response.data.len();
        let products: Vec<Product> = response
            .data
            .into_iter()
            .filter_map(WireProduct::into_product)
            .collect();
        if products.len() < total {
            debug!(skipped = total - products.len(), "Skipped products without price");
        }
        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let params = ProductQuery::new("havregryn").to_params();
        assert_eq!(
            params,
            vec![
                ("search", "havregryn".to_string()),
                ("page", "1".to_string()),
                ("size", "10".to_string()),
                ("sort", "price_asc".to_string()),
            ]
        );
    }

    #[test]
    fn test_filter_params() {
        let mut query = ProductQuery::new("melk").with_size(20).unique(true);
        query.vendor = Some("Tine".to_string());
        query.price_max = Some(30.0);
        let params = query.to_params();
        assert!(params.contains(&("size", "20".to_string())));
        assert!(params.contains(&("unique", "true".to_string())));
        assert!(params.contains(&("vendor", "Tine".to_string())));
        assert!(params.contains(&("price_max", "30".to_string())));
        assert!(!params.iter().any(|(k, _)| *k == "brand"));
    }

    #[test]
    fn test_decode_skips_unpriced() {
        let json = r#"{"data": [
            {"id": 1, "name": "Havregryn", "current_price": 24.9, "vendor": "Axa", "brand": "Axa", "ean": "7035"},
            {"id": 2, "name": "Uten pris", "current_price": null, "vendor": null, "brand": null, "ean": null}
        ]}"#;
        let response: ProductListResponse = serde_json::from_str(json).unwrap();
        let products: Vec<Product> = response
            .data
            .into_iter()
            .filter_map(WireProduct::into_product)
            .collect();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].external_id, 1);
        assert_eq!(products[0].current_price, 24.9);
    }

    #[test]
    fn test_client_requires_api_key() {
        let err = PriceLookupClient::new("https://example.test", " ", Duration::from_secs(1))
            .unwrap_err();
        assert!(matches!(err, LookupError::Configuration(_)));
    }

    #[test]
    fn test_decode_single_product() {
        let json = r#"{"data": {"id": 42, "name": "Kikerter", "current_price": 15.5,
            "vendor": "Eldorado", "brand": null, "ean": "7311041013663"}}"#;
        let response: ProductResponse = serde_json::from_str(json).unwrap();
        let product = response.data.into_product().unwrap();
        assert_eq!(product.external_id, 42);
        assert_eq!(product.vendor.as_deref(), Some("Eldorado"));

        let unpriced = r#"{"data": {"id": 43, "name": "Utgått", "current_price": null}}"#;
        let response: ProductResponse = serde_json::from_str(unpriced).unwrap();
        assert!(response.data.into_product().is_none());
    }

    #[test]
    fn test_decode_barcode_offers() {
        let json = r#"{"data": {"ean": "7038010055720", "products": [
            {"id": 7, "name": "Tine Lettmelk", "current_price": 21.9, "vendor": "Tine"},
            {"id": 8, "name": "Tine Lettmelk", "current_price": null, "vendor": "Tine"}
        ]}}"#;
        let response: EanResponse = serde_json::from_str(json).unwrap();
        let products = response.data.into_products();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].ean.as_deref(), Some("7038010055720"));
    }

    #[test]
    fn test_barcode_must_be_digits() {
        let client =
            PriceLookupClient::new("https://example.test", "key", Duration::from_secs(1)).unwrap();
        assert!(matches!(
            client.product_by_ean("70380/../1"),
            Err(LookupError::InvalidEan(_))
        ));
    }
}
