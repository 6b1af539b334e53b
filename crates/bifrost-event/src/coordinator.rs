//! Coordinator protocol messages.
//!
//! | Method | Direction | Reply |
//! |--------|-----------|-------|
//! | `onCreatePage` | host → engine | none |
//! | `onShowPage` | host → engine | none |
//! | `onDeallocPage` | host → engine | none |
//! | `onBackPressed` | host → engine | none |
//! | `canPop` | host → engine | `bool` |
//! | `popViewController` | engine → host | none |

use crate::EventError;
use bifrost_types::PageId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// Which side sends a coordinator method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    HostToEngine,
    EngineToHost,
}

/// Method names of the coordinator channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoordinatorMethod {
    OnCreatePage,
    OnShowPage,
    OnDeallocPage,
    OnBackPressed,
    CanPop,
    PopViewController,
}

impl CoordinatorMethod {
    /// Every method, host-bound ones last.
    pub const ALL: [CoordinatorMethod; 6] = [
        Self::OnCreatePage,
        Self::OnShowPage,
        Self::OnDeallocPage,
        Self::OnBackPressed,
        Self::CanPop,
        Self::PopViewController,
    ];

    /// Wire name of the method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OnCreatePage => "onCreatePage",
            Self::OnShowPage => "onShowPage",
            Self::OnDeallocPage => "onDeallocPage",
            Self::OnBackPressed => "onBackPressed",
            Self::CanPop => "canPop",
            Self::PopViewController => "popViewController",
        }
    }

    #[must_use]
    pub const fn direction(self) -> Direction {
        match self {
            Self::PopViewController => Direction::EngineToHost,
            _ => Direction::HostToEngine,
        }
    }

    /// Returns `true` for the single request/reply method, `canPop`.
    #[must_use]
    pub const fn expects_reply(self) -> bool {
        matches!(self, Self::CanPop)
    }
}

impl FromStr for CoordinatorMethod {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| EventError::UnknownMethod(s.to_string()))
    }
}

impl std::fmt::Display for CoordinatorMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Page record sent as the argument of every host → engine coordinator call.
///
/// Wire shape: `{"id": int, "route": string, "arguments": any}`.
///
/// # Example
///
/// ```
/// use bifrost_event::PageData;
/// use bifrost_types::PageId;
/// use serde_json::{json, Value};
///
/// let data = PageData::new(PageId::from_raw(1), "/greetings", Value::Null);
/// assert_eq!(
///     data.to_value(),
///     json!({"id": 1, "route": "/greetings", "arguments": null})
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageData {
    pub id: PageId,
    pub route: String,
    #[serde(default)]
    pub arguments: Value,
}

impl PageData {
    #[must_use]
    pub fn new(id: PageId, route: impl Into<String>, arguments: Value) -> Self {
        Self {
            id,
            route: route.into(),
            arguments,
        }
    }

    /// Encodes the record as the opaque channel argument.
    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "id": self.id,
            "route": self.route,
            "arguments": self.arguments,
        })
    }

    /// Decodes a record received as a channel argument.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::InvalidPageData`] if the value does not have the
    /// page record shape.
    pub fn from_value(value: Value) -> Result<Self, EventError> {
        Ok(serde_json::from_value(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bifrost_types::ErrorCode;
    use serde_json::json;

    #[test]
    fn method_names_round_trip() {
        for method in CoordinatorMethod::ALL {
            assert_eq!(method.as_str().parse::<CoordinatorMethod>().unwrap(), method);
        }
    }

    #[test]
    fn unknown_method_is_rejected() {
        let err = "refresh".parse::<CoordinatorMethod>().unwrap_err();
        assert_eq!(err.code(), "EVENT_UNKNOWN_METHOD");
    }

    #[test]
    fn only_can_pop_expects_reply() {
        let replying: Vec<_> = CoordinatorMethod::ALL
            .into_iter()
            .filter(|m| m.expects_reply())
            .collect();
        assert_eq!(replying, vec![CoordinatorMethod::CanPop]);
    }

    #[test]
    fn pop_view_controller_is_engine_to_host() {
        assert_eq!(
            CoordinatorMethod::PopViewController.direction(),
            Direction::EngineToHost
        );
        assert_eq!(
            CoordinatorMethod::OnShowPage.direction(),
            Direction::HostToEngine
        );
    }

    #[test]
    fn page_data_decodes_missing_arguments_as_null() {
        let data = PageData::from_value(json!({"id": 4, "route": "/a"})).unwrap();
        assert_eq!(data.id, PageId::from_raw(4));
        assert_eq!(data.arguments, Value::Null);
    }

    #[test]
    fn page_data_rejects_wrong_shape() {
        let err = PageData::from_value(json!({"route": 5})).unwrap_err();
        assert_eq!(err.code(), "EVENT_INVALID_PAGE_DATA");
    }

    #[test]
    fn page_data_keeps_arguments_untouched() {
        let args = json!({"nested": [1, {"k": "v"}], "flag": true});
        let data = PageData::new(PageId::from_raw(9), "/detail", args.clone());
        let back = PageData::from_value(data.to_value()).unwrap();
        assert_eq!(back.arguments, args);
    }
}
