use std::path::Path;

use image::Rgb;
use imageproc::drawing::draw_text_mut;
use rayon::prelude::*;
use rusttype::{point, Font, Scale};
use tracing::debug;

use crate::catalog::Product;
use crate::config::RenderConfig;
use crate::error::{RenderError, Result};
use crate::render::types::{Frame, ResolutionProfile};
use crate::timeline::Slide;

/// Fraction of the frame width the caption block may occupy
const CAPTION_WIDTH_FRACTION: f32 = 0.9;

/// Common caption font locations, tried in order when no font is configured
const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Renders one text-overlay slide per product per resolution profile.
///
/// Caption text follows the fallback chain on [`Product`]; the absence of text
/// data is never an error here. The font, by contrast, is loaded once at
/// construction and a broken install fails fast.
pub struct SlideRenderer {
    font: Font<'static>,
    config: RenderConfig,
}

impl SlideRenderer {
    pub fn new(config: &RenderConfig) -> Result<Self> {
        let font = match &config.font_path {
            Some(path) => Self::load_font(path)?,
            None => Self::find_system_font()?,
        };

        Ok(Self {
            font,
            config: config.clone(),
        })
    }

    fn load_font(path: &Path) -> Result<Font<'static>> {
        let data = std::fs::read(path).map_err(|_| RenderError::FontLoadFailed {
            path: path.display().to_string(),
        })?;

        Font::try_from_vec(data).ok_or_else(|| {
            RenderError::FontLoadFailed {
                path: path.display().to_string(),
            }
            .into()
        })
    }

    fn find_system_font() -> Result<Font<'static>> {
        for candidate in FONT_CANDIDATES {
            let path = Path::new(candidate);
            if path.exists() {
                debug!("Using caption font: {}", candidate);
                if let Ok(font) = Self::load_font(path) {
                    return Ok(font);
                }
            }
        }

        Err(RenderError::FontUnavailable {
            searched: FONT_CANDIDATES.len(),
        }
        .into())
    }

    /// Render exactly one slide for one product at one target resolution
    pub fn render(&self, product: &Product, profile: ResolutionProfile) -> Slide {
        let caption = product.caption().to_string();
        let frame = self.caption_frame(&caption, profile);
        Slide::new(frame, caption, self.config.slide_secs)
    }

    /// Render slides for the whole product list, preserving input order
    pub fn render_all(&self, products: &[Product], profile: ResolutionProfile) -> Vec<Slide> {
        products
            .par_iter()
            .map(|product| self.render(product, profile))
            .collect()
    }

    /// Blank slide substituted for an empty product list, same background
    /// convention as product slides
    pub fn blank(&self, profile: ResolutionProfile) -> Slide {
        let (width, height) = profile.dimensions();
        let frame = Frame::new_filled(width, height, self.config.background);
        Slide::new(frame, String::new(), self.config.blank_secs)
    }

    /// Draw the caption centered over a solid background, word-wrapped to the
    /// frame width
    fn caption_frame(&self, caption: &str, profile: ResolutionProfile) -> Frame {
        let (width, height) = profile.dimensions();
        let mut frame = Frame::new_filled(width, height, self.config.background);

        let scale = Scale::uniform(self.config.font_size);
        let v_metrics = self.font.v_metrics(scale);
        let line_height = (v_metrics.ascent - v_metrics.descent + v_metrics.line_gap).ceil();

        let max_line_width = width as f32 * CAPTION_WIDTH_FRACTION;
        let lines = wrap_lines(caption, max_line_width, |s| self.text_width(s, scale));

        let block_height = lines.len() as f32 * line_height;
        let block_top = ((height as f32 - block_height) / 2.0).max(0.0);

        for (i, line) in lines.iter().enumerate() {
            let line_width = self.text_width(line, scale);
            let x = ((width as f32 - line_width) / 2.0).max(0.0);
            let y = block_top + i as f32 * line_height;

            draw_text_mut(
                frame.as_image_mut(),
                Rgb(self.config.text_color),
                x as i32,
                y as i32,
                scale,
                &self.font,
                line,
            );
        }

        frame
    }

    fn text_width(&self, text: &str, scale: Scale) -> f32 {
        self.font
            .layout(text, scale, point(0.0, 0.0))
            .last()
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0)
    }
}

/// Greedy word-wrap against a measured line width.
///
/// Parameterized over the measure function so layout can be tested without a
/// font on disk. A single word wider than `max_width` gets its own line
/// unbroken.
pub fn wrap_lines<F>(text: &str, max_width: f32, measure: F) -> Vec<String>
where
    F: Fn(&str) -> f32,
{
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };

        if current.is_empty() || measure(&candidate) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}
