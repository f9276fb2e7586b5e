//! Parsing and emission of the per-response fleet report.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};

use crate::error::{FleetError, FleetResult};
use crate::protocol::headers::*;

/// Roster of fleet nodes: index to address.
///
/// On the wire this is a JSON object whose keys are the indices as strings,
/// e.g. `{"0":"10.0.0.4","1":"10.0.0.7"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeList(pub BTreeMap<usize, String>);

impl NodeList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Highest index in the roster, or 0 for an empty roster.
    pub fn highest_index(&self) -> usize {
        self.0.keys().next_back().copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.0.iter().map(|(i, a)| (*i, a.as_str()))
    }
}

impl<S: Into<String>> FromIterator<(usize, S)> for NodeList {
    fn from_iter<T: IntoIterator<Item = (usize, S)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(i, a)| (i, a.into())).collect())
    }
}

/// Backpressure / result status reported in `Proxy-Status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyStatus {
    /// 200: full passthrough of the destination's response.
    Passthrough,
    /// 202: accepted, the outbound call continues in the background.
    Accepted,
    /// 429: the node is at capacity.
    Rejected,
    /// Any other code.
    Other(u16),
}

impl ProxyStatus {
    pub fn code(self) -> u16 {
        match self {
            ProxyStatus::Passthrough => 200,
            ProxyStatus::Accepted => 202,
            ProxyStatus::Rejected => 429,
            ProxyStatus::Other(code) => code,
        }
    }
}

impl From<u16> for ProxyStatus {
    fn from(code: u16) -> Self {
        match code {
            200 => ProxyStatus::Passthrough,
            202 => ProxyStatus::Accepted,
            429 => ProxyStatus::Rejected,
            other => ProxyStatus::Other(other),
        }
    }
}

impl fmt::Display for ProxyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Everything a fleet node reports about itself on each response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FleetReport {
    /// Predicted remaining capacity.
    pub free: i64,
    /// Index of the responding node.
    pub ordinal: usize,
    /// Roster version.
    pub version: i64,
    /// Per-node monotonic sequence.
    pub counter: i64,
    pub status: ProxyStatus,
    pub list: NodeList,
}

impl FleetReport {
    /// Parse the six report headers. Any missing or malformed header fails
    /// the whole report.
    pub fn from_headers(headers: &HeaderMap) -> FleetResult<Self> {
        let free = parse_header::<i64>(headers, PROXY_FREE)?;
        let ordinal = parse_header::<usize>(headers, PROXY_ORDINAL)?;
        let version = parse_header::<i64>(headers, PROXY_VERSION)?;
        let counter = parse_header::<i64>(headers, PROXY_COUNTER)?;
        let status = parse_header::<u16>(headers, PROXY_STATUS)?;

        let raw_list = header_str(headers, PROXY_LIST)?;
        let list: NodeList = serde_json::from_str(raw_list)
            .map_err(|e| FleetError::protocol(PROXY_LIST, e))?;

        Ok(Self {
            free,
            ordinal,
            version,
            counter,
            status: ProxyStatus::from(status),
            list,
        })
    }

    /// Write the report onto a response's headers, replacing any previous
    /// values.
    pub fn write_headers(&self, headers: &mut HeaderMap) -> FleetResult<()> {
        let list = serde_json::to_string(&self.list)
            .map_err(|e| FleetError::protocol(PROXY_LIST, e))?;

        let values = [
            (PROXY_FREE, self.free.to_string()),
            (PROXY_ORDINAL, self.ordinal.to_string()),
            (PROXY_VERSION, self.version.to_string()),
            (PROXY_COUNTER, self.counter.to_string()),
            (PROXY_STATUS, self.status.code().to_string()),
            (PROXY_LIST, list),
        ];
        for (name, value) in values {
            let header = header_name(name)?;
            let value =
                HeaderValue::from_str(&value).map_err(|e| FleetError::protocol(name, e))?;
            headers.insert(header, value);
        }
        Ok(())
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &'static str) -> FleetResult<&'a str> {
    let value = headers
        .get(name)
        .ok_or_else(|| FleetError::protocol(name, "header missing"))?;
    value.to_str().map_err(|e| FleetError::protocol(name, e))
}

fn parse_header<T>(headers: &HeaderMap, name: &'static str) -> FleetResult<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    header_str(headers, name)?
        .trim()
        .parse::<T>()
        .map_err(|e| FleetError::protocol(name, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FleetReport {
        FleetReport {
            free: 7,
            ordinal: 1,
            version: 3,
            counter: 42,
            status: ProxyStatus::Accepted,
            list: [(0, "a"), (1, "b")].into_iter().collect(),
        }
    }

    #[test]
    fn test_parse_written_headers() {
        let mut headers = HeaderMap::new();
        sample().write_headers(&mut headers).unwrap();

        assert_eq!(headers.get("Proxy-List").unwrap(), r#"{"0":"a","1":"b"}"#);
        assert_eq!(FleetReport::from_headers(&headers).unwrap(), sample());
    }

    #[test]
    fn test_missing_header_is_protocol_error() {
        let mut headers = HeaderMap::new();
        sample().write_headers(&mut headers).unwrap();
        headers.remove("Proxy-Counter");

        match FleetReport::from_headers(&headers) {
            Err(FleetError::Protocol { header, .. }) => assert_eq!(header, PROXY_COUNTER),
            other => panic!("expected protocol error, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_values() {
        let mut headers = HeaderMap::new();
        sample().write_headers(&mut headers).unwrap();
        headers.insert("proxy-free", HeaderValue::from_static("lots"));
        assert!(matches!(
            FleetReport::from_headers(&headers),
            Err(FleetError::Protocol { header: PROXY_FREE, .. })
        ));

        sample().write_headers(&mut headers).unwrap();
        headers.insert("proxy-list", HeaderValue::from_static(r#"{"x":"a"}"#));
        assert!(matches!(
            FleetReport::from_headers(&headers),
            Err(FleetError::Protocol { header: PROXY_LIST, .. })
        ));
    }

    #[test]
    fn test_negative_free_is_accepted() {
        let mut report = sample();
        report.free = -12;
        let mut headers = HeaderMap::new();
        report.write_headers(&mut headers).unwrap();
        assert_eq!(FleetReport::from_headers(&headers).unwrap().free, -12);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ProxyStatus::from(429), ProxyStatus::Rejected);
        assert_eq!(ProxyStatus::from(202), ProxyStatus::Accepted);
        assert_eq!(ProxyStatus::from(200), ProxyStatus::Passthrough);
        assert_eq!(ProxyStatus::from(503), ProxyStatus::Other(503));
        assert_eq!(ProxyStatus::Other(503).code(), 503);
    }

    #[test]
    fn test_highest_index() {
        let list: NodeList = [(4, "x"), (0, "y")].into_iter().collect();
        assert_eq!(list.highest_index(), 4);
        assert_eq!(NodeList::new().highest_index(), 0);
    }
}
