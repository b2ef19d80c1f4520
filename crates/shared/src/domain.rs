use std::fmt;

use chrono::{DateTime, Utc};
use serde::{de::IgnoredAny, Deserialize, Deserializer, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

id_newtype!(RouteId);
id_newtype!(StopId);
id_newtype!(BoxId);

/// Screens the choose-cargo workflow can hand off to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Screen {
    Origin,
    Destinations,
    ActiveRoute,
}

impl Screen {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Origin => "origin",
            Self::Destinations => "destinations",
            Self::ActiveRoute => "activeRoute",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTagColor {
    Int(i64),
    Float(f64),
    Other(IgnoredAny),
}

/// Tag color codes never fail a batch. Integral numbers are kept as-is and
/// range-checked when resolved; anything else reads as untagged.
fn lenient_tag_color<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let code = match Option::<RawTagColor>::deserialize(deserializer)? {
        Some(RawTagColor::Int(code)) => Some(code),
        Some(RawTagColor::Float(code))
            if code.fract() == 0.0 && code >= i64::MIN as f64 && code < i64::MAX as f64 =>
        {
            Some(code as i64)
        }
        _ => None,
    };
    Ok(code)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stop {
    pub id: StopId,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "endereco")]
    pub address: String,
    #[serde(rename = "cidade")]
    pub city: String,
    #[serde(rename = "etiqueta", default, skip_serializing_if = "Option::is_none")]
    pub tag_label: Option<String>,
    #[serde(
        rename = "corEtiqueta",
        default,
        deserialize_with = "lenient_tag_color",
        skip_serializing_if = "Option::is_none"
    )]
    pub tag_color: Option<i64>,
}

/// A single physical box loaded for a route. Multi-box shipments carry
/// `box_index` out of `box_count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteBox {
    pub id: BoxId,
    #[serde(rename = "pedido", default, skip_serializing_if = "Option::is_none")]
    pub order_ref: Option<String>,
    #[serde(rename = "remessa", default, skip_serializing_if = "Option::is_none")]
    pub shipment_ref: Option<String>,
    #[serde(rename = "destinatario", default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    #[serde(rename = "etiqueta", default, skip_serializing_if = "Option::is_none")]
    pub tag_label: Option<String>,
    #[serde(
        rename = "corEtiqueta",
        default,
        deserialize_with = "lenient_tag_color",
        skip_serializing_if = "Option::is_none"
    )]
    pub tag_color: Option<i64>,
    #[serde(rename = "volume", default, skip_serializing_if = "Option::is_none")]
    pub box_index: Option<u32>,
    #[serde(rename = "totalVolumes", default, skip_serializing_if = "Option::is_none")]
    pub box_count: Option<u32>,
}

impl RouteBox {
    /// `"2/3"` for multi-box shipments, `None` for single boxes or when
    /// either side of the pair is missing.
    pub fn multi_box_label(&self) -> Option<String> {
        match (self.box_index, self.box_count) {
            (Some(index), Some(count)) if count > 1 => Some(format!("{index}/{count}")),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreparedRoute {
    pub id: RouteId,
    #[serde(rename = "nome", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "preparadaEm")]
    pub prepared_at: DateTime<Utc>,
    #[serde(rename = "paradas", default)]
    pub stops: Vec<Stop>,
    #[serde(rename = "caixas", default)]
    pub boxes: Vec<RouteBox>,
}
