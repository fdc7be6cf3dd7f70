use serde::{Deserialize, Serialize};

/// The closed set of value shapes a component input or output can carry.
///
/// Marked `non_exhaustive` so that a future type can be added to the wire
/// format without it silently becoming a breaking change for every `match`
/// in this workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum IOType {
  String,
  Int,
  Float,
  Bool,
  Bytes,
  StringList,
  FloatList,
  FloatMatrix,
  BytesList,
  Dict,
  VectorPoint,
  VectorPointList,
  SearchPayload,
  SearchPayloadList,
  Json,
}

impl IOType {
  /// All variants, for exhaustive iteration in registry/model validation.
  pub const ALL: &'static [IOType] = &[
    IOType::String,
    IOType::Int,
    IOType::Float,
    IOType::Bool,
    IOType::Bytes,
    IOType::StringList,
    IOType::FloatList,
    IOType::FloatMatrix,
    IOType::BytesList,
    IOType::Dict,
    IOType::VectorPoint,
    IOType::VectorPointList,
    IOType::SearchPayload,
    IOType::SearchPayloadList,
    IOType::Json,
  ];
}

impl std::fmt::Display for IOType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let name = match self {
      IOType::String => "string",
      IOType::Int => "int",
      IOType::Float => "float",
      IOType::Bool => "bool",
      IOType::Bytes => "bytes",
      IOType::StringList => "string_list",
      IOType::FloatList => "float_list",
      IOType::FloatMatrix => "float_matrix",
      IOType::BytesList => "bytes_list",
      IOType::Dict => "dict",
      IOType::VectorPoint => "vector_point",
      IOType::VectorPointList => "vector_point_list",
      IOType::SearchPayload => "search_payload",
      IOType::SearchPayloadList => "search_payload_list",
      IOType::Json => "json",
    };
    f.write_str(name)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn serde_round_trip_covers_every_variant() {
    for ty in IOType::ALL {
      let json = serde_json::to_string(ty).unwrap();
      let back: IOType = serde_json::from_str(&json).unwrap();
      assert_eq!(*ty, back);
    }
  }

  #[test]
  fn wire_names_are_snake_case() {
    assert_eq!(serde_json::to_string(&IOType::FloatMatrix).unwrap(), "\"float_matrix\"");
    assert_eq!(serde_json::to_string(&IOType::Json).unwrap(), "\"json\"");
  }
}
