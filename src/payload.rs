//! Known export payloads.
//!
//! The codec does not care what it carries. Consumers that need a specific
//! shape decode first and validate here as a second step.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::codec::{self, CodecError, CompressionLevel, Payload};

#[derive(Debug, Error)]
pub enum ShapeError {
    #[error("token could not be decoded")]
    Undecodable,

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("payload matches no known export shape (weekly report: {weekly}; class roster: {roster})")]
    Unrecognized { weekly: String, roster: String },
}

/// Link-creator payload: who is in the class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ClassRoster {
    pub school_name: String,
    pub class_name: String,
    pub students: Vec<String>,
    #[serde(default)]
    pub teachers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDate {
    pub raw: String,
    pub formatted: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    #[serde(default)]
    pub school_name: String,
    pub class_name: String,
    pub date: ReportDate,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEntry {
    pub present: bool,
    // Either a number of minutes or "" when on time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub late_minutes: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
    #[serde(default)]
    pub assigned_students: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Homework {
    #[serde(default)]
    pub assignments: Vec<Assignment>,
}

/// Weekly supervision report. Attendance and grades are keyed by student
/// name; grades are grouped by homework type label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyReport {
    pub metadata: ReportMetadata,
    pub attendance: BTreeMap<String, AttendanceEntry>,
    #[serde(default)]
    pub homework: Homework,
    #[serde(default)]
    pub previous_homework: BTreeMap<String, BTreeMap<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "camelCase")]
pub enum ExportShape {
    WeeklyReport(WeeklyReport),
    ClassRoster(ClassRoster),
}

impl ExportShape {
    pub fn from_payload(payload: &Payload) -> Result<Self, ShapeError> {
        let weekly = match WeeklyReport::deserialize(payload) {
            Ok(report) => return Ok(ExportShape::WeeklyReport(report)),
            Err(e) => e.to_string(),
        };
        let roster = match ClassRoster::deserialize(payload) {
            Ok(roster) => return Ok(ExportShape::ClassRoster(roster)),
            Err(e) => e.to_string(),
        };
        Err(ShapeError::Unrecognized { weekly, roster })
    }

    pub fn to_payload(&self) -> Result<Payload, CodecError> {
        match self {
            ExportShape::WeeklyReport(r) => serde_json::to_value(r),
            ExportShape::ClassRoster(r) => serde_json::to_value(r),
        }
        .map_err(CodecError::Serialize)
    }

    pub fn class_name(&self) -> &str {
        match self {
            ExportShape::WeeklyReport(r) => &r.metadata.class_name,
            ExportShape::ClassRoster(r) => &r.class_name,
        }
    }
}

pub fn encode_export(shape: &ExportShape, level: CompressionLevel) -> Result<String, ShapeError> {
    let payload = shape.to_payload()?;
    Ok(codec::compressed::try_compress(&payload, level)?)
}

pub fn decode_export(token: &str) -> Result<ExportShape, ShapeError> {
    let payload = codec::decode_unknown(token).ok_or(ShapeError::Undecodable)?;
    ExportShape::from_payload(&payload)
}

/// Decode any token straight into a caller-chosen type.
pub fn decode_as<T: DeserializeOwned>(token: &str) -> Result<T, ShapeError> {
    let payload = codec::decode_unknown(token).ok_or(ShapeError::Undecodable)?;
    serde_json::from_value(payload).map_err(|e| ShapeError::Codec(CodecError::Json(e)))
}
