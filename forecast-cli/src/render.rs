use std::fmt;

use console::{Alignment, pad_str};
use forecast_core::{
    ComparisonResult, IconCategory, TemperatureSpread, provider_label, stats::TemperaturePoint,
};

const NO_SUMMARY: &str = "No summary available.";
const NAME_WIDTH: usize = 14;
const CONDITION_WIDTH: usize = 12;
const CHART_NAME_WIDTH: usize = 6;
const BAR_WIDTH: usize = 24;

pub fn glyph(icon: IconCategory) -> &'static str {
    match icon {
        IconCategory::Sunny => "☀",
        IconCategory::Cloudy => "☁",
        IconCategory::Rain => "☂",
        IconCategory::Snow => "❄",
        IconCategory::Thunder => "⚡",
        IconCategory::Unknown => "?",
    }
}

/// Plain-text report: header, one line per provider, spread chart, summary, links.
pub struct Report<'a>(pub &'a ComparisonResult);

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;

        writeln!(f, "{}  ({} の予報比較)", result.location, result.date)?;
        writeln!(f)?;

        for p in &result.providers {
            writeln!(
                f,
                "{} {} {} 最高 {} / 最低 {}  降水 {}",
                pad(glyph(p.icon_category), 2, Alignment::Left),
                pad(provider_label(&p.source_name), NAME_WIDTH, Alignment::Left),
                pad(&p.condition, CONDITION_WIDTH, Alignment::Left),
                pad(&p.high_temp, 6, Alignment::Right),
                pad(&p.low_temp, 6, Alignment::Right),
                pad(&p.rain_prob, 4, Alignment::Right),
            )?;
            if let Some(url) = &p.url {
                writeln!(f, "    {url}")?;
            }
        }

        let spread = TemperatureSpread::from_providers(&result.providers);
        if let Some(header) = spread_header(&spread) {
            writeln!(f)?;
            writeln!(f, "{header}")?;
            for point in &spread.points {
                writeln!(f, "{}", chart_row(point, &spread))?;
            }
        }

        writeln!(f)?;
        let summary = if result.summary.is_empty() { NO_SUMMARY } else { result.summary.as_str() };
        writeln!(f, "{summary}")?;

        if !result.citations.is_empty() {
            writeln!(f)?;
            writeln!(f, "Reference Links")?;
            for (idx, c) in result.citations.iter().enumerate() {
                writeln!(f, "{}. {} <{}>", idx + 1, c.title, c.uri)?;
            }
        }

        Ok(())
    }
}

/// Pad by terminal display width so double-width text lines up.
fn pad(text: &str, width: usize, align: Alignment) -> String {
    pad_str(text, width, align, None).into_owned()
}

fn spread_header(spread: &TemperatureSpread) -> Option<String> {
    let (min, max) = spread.overall_range()?;

    let mut parts = vec![format!("全体 {min}°〜{max}°")];
    if let Some(gap) = spread.high_disagreement() {
        parts.push(format!("最高の差 {gap}°"));
    }
    if let Some(gap) = spread.low_disagreement() {
        parts.push(format!("最低の差 {gap}°"));
    }

    Some(format!("気温予報のばらつき: {}", parts.join(" / ")))
}

/// One chart line: short name, low/high, and a bar placed on the overall range.
fn chart_row(point: &TemperaturePoint, spread: &TemperatureSpread) -> String {
    let value = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| format!("{v}°"));

    let mut bar = vec![' '; BAR_WIDTH];
    if let Some((min, max)) = spread.overall_range() {
        let column = |v: f64| {
            if max > min {
                (((v - min) / (max - min)) * (BAR_WIDTH - 1) as f64).round() as usize
            } else {
                0
            }
        };
        match (point.low, point.high) {
            (Some(low), Some(high)) => {
                let (a, b) = (column(low.min(high)), column(low.max(high)));
                bar[a..=b].iter_mut().for_each(|c| *c = '━');
                bar[a] = '●';
                bar[b] = '●';
            }
            (Some(v), None) | (None, Some(v)) => bar[column(v)] = '●',
            (None, None) => {}
        }
    }

    format!(
        "  {} {} {} |{}|",
        pad(&point.name, CHART_NAME_WIDTH, Alignment::Left),
        pad(&value(point.low), 6, Alignment::Right),
        pad(&value(point.high), 6, Alignment::Right),
        bar.into_iter().collect::<String>().trim_end(),
    )
}
