//! Persistence of embedded watermarks.
//!
//! Nothing in the algorithm keeps state between calls, whoever embeds a watermark has to retain
//! it to test derived images later. The record stores the watermarks together with the
//! configuration they were embedded with, as json.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::WatermarkConfig;
use crate::error::{Result, WatermarkError};
use crate::watermark::Watermark;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatermarkRecord {
    /// Free form description, for example who received the marked copy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub config: WatermarkConfig,
    pub watermarks: Vec<Watermark>,
}

impl WatermarkRecord {
    pub fn new(config: WatermarkConfig) -> Self {
        WatermarkRecord {
            description: None,
            config,
            watermarks: vec![],
        }
    }

    /// Add a watermark, its length must match the configured length.
    pub fn push(&mut self, watermark: Watermark) -> Result<()> {
        if watermark.len() != self.config.length {
            return Err(WatermarkError::LengthMismatch {
                expected: self.config.length,
                found: watermark.len(),
            });
        }
        self.watermarks.push(watermark);
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let record: WatermarkRecord = serde_json::from_reader(reader)?;
        if let Some(bad) = record
            .watermarks
            .iter()
            .find(|w| w.len() != record.config.length)
        {
            return Err(WatermarkError::LengthMismatch {
                expected: record.config.length,
                found: bad.len(),
            });
        }
        Ok(record)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}
