// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt::Display;
use std::fmt::Formatter;
use std::path::Path;

use clap::ValueEnum;
use serde::Serialize;

use crate::config::Config;
use crate::error::Fallible;
use crate::progress::DailyStats;
use crate::progress::DayRecord;

#[derive(ValueEnum, Clone)]
pub enum StatsFormat {
    /// One line per day.
    Text,
    /// JSON output, for charting tools.
    Json,
}

impl Display for StatsFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsFormat::Text => write!(f, "text"),
            StatsFormat::Json => write!(f, "json"),
        }
    }
}

pub fn print_stats(source: &Path, days: usize, format: StatsFormat) -> Fallible<()> {
    let config = Config::for_source(source)?;
    let stats = DailyStats::load(&config.stats_path(source))?;
    println!("{}", render_stats(&stats, days, format)?);
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsExport {
    days: Vec<DayRecord>,
    total_reviewed: usize,
}

fn render_stats(stats: &DailyStats, days: usize, format: StatsFormat) -> Fallible<String> {
    let recent = stats.recent(days);
    match format {
        StatsFormat::Text => {
            if recent.is_empty() {
                return Ok("No reviews recorded.".to_string());
            }
            let lines: Vec<String> = recent
                .iter()
                .map(|r| {
                    format!(
                        "{}  reviewed {:>4}  known {:>4}  unknown {:>4}",
                        r.date, r.reviewed, r.known, r.unknown
                    )
                })
                .collect();
            Ok(lines.join("\n"))
        }
        StatsFormat::Json => {
            let export = StatsExport {
                total_reviewed: recent.iter().map(|r| r.reviewed).sum(),
                days: recent,
            };
            Ok(serde_json::to_string_pretty(&export)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text() -> Fallible<()> {
        let stats = DailyStats::parse("2024-01-01,5,3,2\n2024-01-02,4,4,0\n")?;
        let text = render_stats(&stats, 1, StatsFormat::Text)?;
        assert_eq!(text, "2024-01-02  reviewed    4  known    4  unknown    0");
        let empty = render_stats(&DailyStats::new(), 7, StatsFormat::Text)?;
        assert_eq!(empty, "No reviews recorded.");
        Ok(())
    }

    #[test]
    fn test_json() -> Fallible<()> {
        let stats = DailyStats::parse("2024-01-01,5,3,2\n2024-01-02,4,4,0\n")?;
        let json = render_stats(&stats, 7, StatsFormat::Json)?;
        let value: serde_json::Value = serde_json::from_str(&json)?;
        assert_eq!(value["totalReviewed"], 9);
        assert_eq!(value["days"][0]["date"], "2024-01-01");
        assert_eq!(value["days"][1]["known"], 4);
        Ok(())
    }
}
