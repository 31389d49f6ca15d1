//! Chart assembly: a fluent builder that turns decoded geometry and joined
//! data into a standalone SVG document.
//!
//! Each step consumes and returns the builder, so the pipeline reads like
//! the construction order it enforces: canvas, then map paths, then colors,
//! then legend, then tooltips. Calling a step before its prerequisite is an
//! error, not a silent misrender.

use std::collections::HashMap;
use std::fmt::Write as _;

use anyhow::{Context, Result, bail, ensure};
use tracing::{debug, warn};

use crate::join::JoinPolicy;
use crate::legend::{self, Legend};
use crate::model::{FipsCode, JoinedCounty};
use crate::scale::QuantizeScale;
use crate::svg;
use crate::tooltip;
use crate::topology::DecodedTopology;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartConfig {
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 1100.0,
            height: 700.0,
            margin: Margin {
                top: 60.0,
                right: 60.0,
                bottom: 60.0,
                left: 60.0,
            },
        }
    }
}

/// One drawable county: its joined record, path data, and (once painted and
/// wired) fill color and tooltip text. Kept inspectable for interaction
/// layers and tests.
#[derive(Debug, Clone)]
pub struct CountyPath {
    pub county: JoinedCounty,
    pub d: String,
    pub fill: Option<&'static str>,
    pub title: Option<String>,
}

pub struct ChartBuilder {
    config: ChartConfig,
    topology: DecodedTopology,
    joined: HashMap<FipsCode, JoinedCounty>,
    values: Vec<f64>,
    policy: JoinPolicy,
    canvas: bool,
    drawn: bool,
    counties: Vec<CountyPath>,
    border_path: Option<String>,
    scale: Option<QuantizeScale>,
    legend: Option<Legend>,
}

impl ChartBuilder {
    pub fn new(topology: DecodedTopology, joined: Vec<JoinedCounty>, policy: JoinPolicy) -> Self {
        let values = joined.iter().map(|county| county.bachelor).collect();
        let joined = joined
            .into_iter()
            .map(|county| (county.id.clone(), county))
            .collect();
        Self {
            config: ChartConfig::default(),
            topology,
            joined,
            values,
            policy,
            canvas: false,
            drawn: false,
            counties: Vec::new(),
            border_path: None,
            scale: None,
            legend: None,
        }
    }

    pub fn with_config(mut self, config: ChartConfig) -> Self {
        self.config = config;
        self
    }

    /// Establishes the drawing surface. Must precede every drawing step.
    pub fn make_canvas(mut self) -> Self {
        self.canvas = true;
        self
    }

    /// Generates county paths (with their joined data attached) and the
    /// state border overlay.
    ///
    /// A county geometry absent from the joined data fails the build under
    /// [`JoinPolicy::Strict`] and is skipped with a warning under
    /// [`JoinPolicy::Lenient`].
    pub fn draw_map(mut self) -> Result<Self> {
        ensure!(self.canvas, "draw_map called before make_canvas");

        for county in &self.topology.counties {
            let Some(joined) = self.joined.get(&county.id) else {
                match self.policy {
                    JoinPolicy::Strict => {
                        bail!("county {} has no joined education data", county.id)
                    }
                    JoinPolicy::Lenient => {
                        warn!(fips = %county.id, "county not in joined data, not drawn");
                        continue;
                    }
                }
            };
            self.counties.push(CountyPath {
                county: joined.clone(),
                d: svg::multipolygon_to_path(&county.shape),
                fill: None,
                title: None,
            });
        }

        self.border_path = Some(svg::lines_to_path(&self.topology.state_borders));
        self.drawn = true;
        debug!(counties = self.counties.len(), "map paths generated");
        Ok(self)
    }

    /// Builds the quantize scale over the joined attainment values and
    /// assigns each drawn county its bucket color.
    pub fn paint_colors(mut self) -> Result<Self> {
        ensure!(self.drawn, "paint_colors called before draw_map");

        let scale = QuantizeScale::from_values(self.values.iter().copied())
            .context("cannot color a chart with no joined counties")?;
        for path in &mut self.counties {
            path.fill = Some(scale.color(path.county.bachelor));
        }
        self.scale = Some(scale);
        Ok(self)
    }

    /// Lays out the legend. Requires the color scale from [`paint_colors`].
    ///
    /// [`paint_colors`]: ChartBuilder::paint_colors
    pub fn make_legend(mut self) -> Result<Self> {
        let Some(scale) = &self.scale else {
            bail!("make_legend called before paint_colors");
        };
        self.legend = Some(legend::build(scale, self.config.width));
        Ok(self)
    }

    /// Attaches hover text to every drawn county, rendered as SVG `<title>`
    /// elements so any viewer shows them on hover.
    pub fn make_tooltips(mut self) -> Result<Self> {
        ensure!(self.drawn, "make_tooltips called before draw_map");
        for path in &mut self.counties {
            path.title = Some(tooltip::describe(&path.county));
        }
        Ok(self)
    }

    pub fn counties(&self) -> &[CountyPath] {
        &self.counties
    }

    pub fn scale(&self) -> Option<&QuantizeScale> {
        self.scale.as_ref()
    }

    pub fn legend(&self) -> Option<&Legend> {
        self.legend.as_ref()
    }

    /// Serializes the finished chart as an SVG document.
    pub fn finish(self) -> Result<String> {
        ensure!(self.canvas, "finish called before make_canvas");
        ensure!(self.drawn, "finish called before draw_map");
        ensure!(self.scale.is_some(), "finish called before paint_colors");
        let legend = self
            .legend
            .as_ref()
            .context("finish called before make_legend")?;

        let ChartConfig {
            width,
            height,
            margin,
        } = self.config;

        let mut out = String::new();
        writeln!(
            out,
            r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>"#
        )?;
        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}" preserveAspectRatio="xMidYMid meet">"#
        )?;
        writeln!(
            out,
            r#"<defs>
<style>
    .county {{ stroke: none; }}
    .state {{ fill: none; stroke: #ffffff; stroke-width: 0.7; stroke-linejoin: round; }}
    #legend text {{ font: 11px sans-serif; }}
</style>
</defs>"#
        )?;

        writeln!(out, r#"<g transform="translate({}, {})">"#, margin.left, margin.top)?;
        for path in &self.counties {
            write!(
                out,
                r#"<path class="county" data-fips="{}" data-education="{}" data-area="{}" data-state="{}" fill="{}" d="{}">"#,
                svg::escape(path.county.id.as_str()),
                path.county.bachelor,
                svg::escape(&path.county.area),
                svg::escape(&path.county.state),
                path.fill.unwrap_or("none"),
                path.d,
            )?;
            if let Some(title) = &path.title {
                write!(out, "<title>{}</title>", svg::escape(title))?;
            }
            writeln!(out, "</path>")?;
        }
        if let Some(border_path) = &self.border_path {
            writeln!(out, r#"<path class="state" d="{border_path}"/>"#)?;
        }
        writeln!(out, "</g>")?;

        writeln!(
            out,
            r#"<g id="legend" transform="translate({}, 0)">"#,
            legend.offset_x
        )?;
        for swatch in &legend.swatches {
            writeln!(
                out,
                r#"<rect class="legend" x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
                swatch.x, swatch.y, swatch.width, swatch.height, swatch.color
            )?;
        }
        for label in &legend.labels {
            writeln!(
                out,
                r#"<text x="{}" y="{}">{}</text>"#,
                label.x, label.y, label.text
            )?;
        }
        writeln!(out, "</g>")?;
        writeln!(out, "</svg>")?;

        Ok(out)
    }
}
