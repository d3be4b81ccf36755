use std::collections::BTreeMap;

use crate::http_client::{HttpMethod, TransportOptions};

/// Per-provider request parameters, headers, and transport overrides.
///
/// Built once through [`ProviderAttributesBuilder`] and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderAttributes {
    params: BTreeMap<String, String>,
    headers: BTreeMap<String, String>,
    method: HttpMethod,
    options: TransportOptions,
}

impl ProviderAttributes {
    pub fn builder() -> ProviderAttributesBuilder {
        ProviderAttributesBuilder::default()
    }

    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    pub const fn options(&self) -> TransportOptions {
        self.options
    }

    /// URL-encoded `name=value` pairs joined with `&`.
    pub fn query_string(&self) -> String {
        self.params
            .iter()
            .map(|(name, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(name),
                    urlencoding::encode(value)
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Builder for [`ProviderAttributes`].
#[derive(Debug, Clone, Default)]
pub struct ProviderAttributesBuilder {
    attributes: ProviderAttributes,
}

impl ProviderAttributesBuilder {
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.params.insert(name.into(), value.into());
        self
    }

    /// Set the parameter only when a value is present.
    pub fn optional_param(self, name: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.param(name, value),
            None => self,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes
            .headers
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    pub fn method(mut self, method: HttpMethod) -> Self {
        self.attributes.method = method;
        self
    }

    pub fn verify_tls(mut self, verify_tls: bool) -> Self {
        self.attributes.options.verify_tls = verify_tls;
        self
    }

    pub fn stream(mut self, stream: bool) -> Self {
        self.attributes.options.stream = stream;
        self
    }

    pub fn build(self) -> ProviderAttributes {
        self.attributes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_string_encodes_names_and_values() {
        let attributes = ProviderAttributes::builder()
            .param("q", "Iain M. Banks")
            .param("type", "authors")
            .build();

        assert_eq!(attributes.query_string(), "q=Iain%20M.%20Banks&type=authors");
    }

    #[test]
    fn optional_params_are_skipped_when_absent() {
        let attributes = ProviderAttributes::builder()
            .optional_param("keyword", Some("dragons"))
            .optional_param("page", None::<String>)
            .build();

        assert_eq!(attributes.param("keyword"), Some("dragons"));
        assert_eq!(attributes.param("page"), None);
    }

    #[test]
    fn transport_overrides_default_to_verified_buffered_get() {
        let attributes = ProviderAttributes::default();
        assert_eq!(attributes.method(), HttpMethod::Get);
        assert!(attributes.options().verify_tls);
        assert!(!attributes.options().stream);

        let relaxed = ProviderAttributes::builder().verify_tls(false).stream(true).build();
        assert!(!relaxed.options().verify_tls);
        assert!(relaxed.options().stream);
    }
}
