use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::BarrelError;
use crate::options::LoaderOptions;

const TARGET_SEPARATOR: &str = "!=!";
const WILDCARD_FLAG: &str = "wildcard";

/// Everything outside identifier ASCII is escaped, so `,` `&` `!` `=` and
/// `%` inside a name never reach the query syntax.
const NAME_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'_').remove(b'$');

/// Percent-encodes each name and joins them with `,`.
pub(crate) fn encode_names(names: &[String]) -> String {
    names
        .iter()
        .map(|n| utf8_percent_encode(n, NAME_SET).to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn decode_name(raw: &str, encoded: &str) -> Result<String, BarrelError> {
    percent_decode_str(encoded)
        .decode_utf8()
        .map(|n| n.into_owned())
        .map_err(|_| BarrelError::BadRequest(format!("name is not UTF-8 in {}", raw)))
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolutionRequest {
    pub resource_path: String,
    pub names: Vec<String>,
    /// Set when the request was produced by wildcard propagation.
    pub wildcard: bool,
}

impl ResolutionRequest {
    pub fn new<S: Into<String>>(resource_path: S, names: Vec<String>, wildcard: bool) -> Self {
        Self {
            resource_path: resource_path.into(),
            names,
            wildcard,
        }
    }

    /// `<prefix>?names=a,b[&wildcard]!=!<resource>`, names percent-encoded.
    pub fn encode(&self, options: &LoaderOptions) -> String {
        let mut out = format!("{}?names={}", options.request_prefix, encode_names(&self.names));
        if self.wildcard {
            out.push('&');
            out.push_str(WILDCARD_FLAG);
        }
        out.push_str(TARGET_SEPARATOR);
        out.push_str(&self.resource_path);
        out
    }

    /// Parses an encoded request. Plain module paths yield `Ok(None)`.
    pub fn decode(raw: &str, options: &LoaderOptions) -> Result<Option<Self>, BarrelError> {
        let Some(rest) = raw.strip_prefix(options.request_prefix.as_str()) else {
            return Ok(None);
        };
        let Some(rest) = rest.strip_prefix('?') else {
            return Err(BarrelError::BadRequest(raw.to_string()));
        };
        let Some((query, target)) = rest.split_once(TARGET_SEPARATOR) else {
            return Err(BarrelError::BadRequest(raw.to_string()));
        };
        if target.is_empty() {
            return Err(BarrelError::BadRequest(raw.to_string()));
        }

        let mut names = Vec::new();
        let mut wildcard = false;
        for part in query.split('&') {
            match part.split_once('=') {
                Some(("names", v)) => {
                    if v == options.placeholder {
                        return Err(BarrelError::BadRequest(format!(
                            "unsubstituted placeholder in {}",
                            raw
                        )));
                    }
                    for n in v.split(',').filter(|n| !n.is_empty()) {
                        names.push(decode_name(raw, n)?);
                    }
                }
                None if part == WILDCARD_FLAG => wildcard = true,
                _ => {}
            }
        }

        Ok(Some(Self {
            resource_path: target.to_string(),
            names,
            wildcard,
        }))
    }

    pub fn key(&self) -> RequestKey {
        RequestKey::Parametrized {
            resource_path: self.resource_path.clone(),
            names: self.names.clone(),
            wildcard: self.wildcard,
        }
    }
}

/// Module identity the host must honor: one instance per distinct key.
/// Requests that differ only in names or wildcard mode get distinct keys,
/// and none of them collides with the untransformed file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RequestKey {
    Plain(String),
    Parametrized {
        resource_path: String,
        names: Vec<String>,
        wildcard: bool,
    },
}

impl RequestKey {
    pub fn plain<S: Into<String>>(resource_path: S) -> Self {
        RequestKey::Plain(resource_path.into())
    }

    /// Key for a raw module specifier as seen by the host.
    pub fn for_specifier(raw: &str, options: &LoaderOptions) -> Result<Self, BarrelError> {
        Ok(match ResolutionRequest::decode(raw, options)? {
            Some(req) => req.key(),
            None => RequestKey::plain(raw),
        })
    }
}
