use std::collections::HashMap;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::io_type::IOType;

/// An opaque, string-keyed map of JSON-compatible values.
///
/// Used for both `Dict` and `SearchPayload`/`SearchPayloadList` — the two
/// IOTypes share this representation and differ only in the semantic tag
/// carried alongside them (a generic dict vs. a search-hit's metadata
/// payload).
pub type Dict = HashMap<String, serde_json::Value>;

/// A single runtime value flowing along a pipeline edge.
///
/// One variant per [`IOType`] tag; `io_type` recovers the tag from a value
/// without a separate lookup table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
  String(String),
  Int(i64),
  Float(f64),
  Bool(bool),
  #[serde(with = "bytes_as_base64")]
  Bytes(Vec<u8>),
  StringList(Vec<String>),
  FloatList(Vec<f64>),
  FloatMatrix(Vec<Vec<f64>>),
  #[serde(with = "bytes_list_as_base64")]
  BytesList(Vec<Vec<u8>>),
  Dict(Dict),
  VectorPoint(Vec<f32>),
  VectorPointList(Vec<Vec<f32>>),
  SearchPayload(Dict),
  SearchPayloadList(Vec<Dict>),
  Json(serde_json::Value),
}

impl Value {
  /// The [`IOType`] tag this value carries.
  pub fn io_type(&self) -> IOType {
    match self {
      Value::String(_) => IOType::String,
      Value::Int(_) => IOType::Int,
      Value::Float(_) => IOType::Float,
      Value::Bool(_) => IOType::Bool,
      Value::Bytes(_) => IOType::Bytes,
      Value::StringList(_) => IOType::StringList,
      Value::FloatList(_) => IOType::FloatList,
      Value::FloatMatrix(_) => IOType::FloatMatrix,
      Value::BytesList(_) => IOType::BytesList,
      Value::Dict(_) => IOType::Dict,
      Value::VectorPoint(_) => IOType::VectorPoint,
      Value::VectorPointList(_) => IOType::VectorPointList,
      Value::SearchPayload(_) => IOType::SearchPayload,
      Value::SearchPayloadList(_) => IOType::SearchPayloadList,
      Value::Json(_) => IOType::Json,
    }
  }
}

mod bytes_as_base64 {
  use super::*;

  pub fn serialize<S: Serializer>(bytes: &[u8], ser: S) -> Result<S::Ok, S::Error> {
    ser.serialize_str(&BASE64.encode(bytes))
  }

  pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<u8>, D::Error> {
    let encoded = String::deserialize(de)?;
    BASE64.decode(&encoded).map_err(serde::de::Error::custom)
  }
}

mod bytes_list_as_base64 {
  use super::*;

  pub fn serialize<S: Serializer>(list: &[Vec<u8>], ser: S) -> Result<S::Ok, S::Error> {
    let encoded: Vec<String> = list.iter().map(|b| BASE64.encode(b)).collect();
    encoded.serialize(ser)
  }

  pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<Vec<u8>>, D::Error> {
    let encoded = Vec::<String>::deserialize(de)?;
    encoded
      .into_iter()
      .map(|s| BASE64.decode(s).map_err(serde::de::Error::custom))
      .collect()
  }
}
