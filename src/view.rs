//! Viewport state and the line-oriented view files that drive it.
//!
//! A view file sets up an initial viewport and lists pan/zoom steps:
//!
//! ```text
//! # comments run to end of line
//! center 1/3 -0.25
//! pixel_size 1/50
//! canvas 500 500
//! precision 9
//! draw_level 0
//! inner_frame 0.2 0.8
//! pan 1 0
//! zoom 2
//! zoom 3/2 4     # same as four zoom 3/2 lines
//! ```
//!
//! Rational arguments accept the expression grammar of
//! [`parse_rational_expr`](crate::expr::parse_rational_expr).

use std::io::BufRead;

use num_bigint::BigInt;
use phf::phf_map;

use crate::approximate::approx_bbox;
use crate::bbox::BBox;
use crate::errors::*;
use crate::expr::format_rational;
use crate::rational::Rational;

//////////////////////////////////////////////////////////////////////
// parse a fixed list of typed tokens, erroring on missing or extra
// tokens

macro_rules! parse_tokens {

    // finalizer - no more input to match, just error if remaining
    // input or return collected outputs
    ($it:ident { } -> { $($tuple:ident,)* } ) => (
        match $it.next() {
            Some(value) => Err(format!("found extra token(s) starting with \"{:}\"", value)),
            None => Ok(($($tuple),*))
        }
    );

    // name, type pair
    ($it:ident { $name:ident : $type:ident, $($ts:tt)* } -> { $($tuple:ident,)* } ) => (
        match $it.next() {
            None => Err(format!("missing token for {:}", stringify!($name))),
            Some(value) => match value.parse::<$type>() {
                Ok($name) => parse_tokens!( $it { $($ts)* } -> { $($tuple,)* $name, } ),
                Err(e) => Err(format!("error parsing {:} as type {:}: {:}",
                                      value, stringify!($type), e)),
            }
        }
    );

    // entry point
    ($a:expr, { $($ts:tt)+ }) => (
        {
            let mut it = $a.iter();
            parse_tokens!( it { $($ts)* , } -> { } )
        }
    );

}

//////////////////////////////////////////////////////////////////////
// viewport: a canvas of whole pixels centered on an exact point

#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    pub center_x:   Rational,
    pub center_y:   Rational,
    pub pixel_size: Rational, // world units per pixel
    pub width:      u32,      // pixels
    pub height:     u32,      // pixels
}

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Pan(i64, i64),  // by whole pixels
    Zoom(Rational), // > 1 zooms in
}

impl Viewport {

    pub fn new(center_x: Rational, center_y: Rational, pixel_size: Rational,
               width: u32, height: u32) -> Viewport {
        Viewport {
            center_x: center_x,
            center_y: center_y,
            pixel_size: pixel_size,
            width: width,
            height: height,
        }
    }

    /// `(left, bottom, right, top)` in world coordinates.
    pub fn rect(&self) -> (Rational, Rational, Rational, Rational) {

        let half = Rational::reduced(1.into(), 2.into());

        let half_w = &(&self.pixel_size * &Rational::from_integer(self.width)) * &half;
        let half_h = &(&self.pixel_size * &Rational::from_integer(self.height)) * &half;

        (&self.center_x - &half_w,
         &self.center_y - &half_h,
         &self.center_x + &half_w,
         &self.center_y + &half_h)

    }

    /// Exact box covering the viewport.
    pub fn bbox(&self, precision: &BigInt) -> BBox {
        let (left, bottom, right, top) = self.rect();
        approx_bbox(&left, &bottom, &right, &top, precision)
    }

    pub fn pan(&mut self, dx: i64, dy: i64) {
        self.center_x = &self.center_x + &(&self.pixel_size * &Rational::from_integer(dx));
        self.center_y = &self.center_y + &(&self.pixel_size * &Rational::from_integer(dy));
    }

    /// Zoom about the center; `factor > 1` zooms in.
    pub fn zoom(&mut self, factor: &Rational) -> Result<()> {

        if factor.is_negative() {
            bail!("zoom factor must be positive, got {}", factor);
        }

        self.pixel_size = self.pixel_size.checked_div(factor)?;

        Ok(())

    }

    pub fn apply(&mut self, step: &Step) -> Result<()> {

        match step {
            Step::Pan(dx, dy) => self.pan(*dx, *dy),
            Step::Zoom(factor) => self.zoom(factor)?,
        }

        Ok(())

    }

    pub fn describe(&self) -> String {
        format!("center ({}, {}), pixel {}",
                format_rational(&self.center_x),
                format_rational(&self.center_y),
                format_rational(&self.pixel_size))
    }

}

impl Default for Viewport {

    fn default() -> Viewport {
        Viewport::new(Rational::zero(), Rational::zero(),
                      Rational::reduced(1.into(), 50.into()),
                      500, 500)
    }

}

//////////////////////////////////////////////////////////////////////
// view file contents

#[derive(Debug, Clone, PartialEq)]
pub struct ViewSpec {
    pub viewport:    Viewport,
    pub precision:   BigInt,     // denominator floor for approximations
    pub draw_level:  usize,      // substitution steps above the leaves
    pub inner_frame: (f64, f64), // where the viewport sits on the page
    pub steps:       Vec<Step>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Keyword {
    Center,
    PixelSize,
    Canvas,
    Precision,
    DrawLevel,
    InnerFrame,
    Pan,
    Zoom,
}

// keyword lookup for view files
static KEYWORDS: phf::Map<&'static str, Keyword> = phf_map! {
    "center" => Keyword::Center,
    "pixel_size" => Keyword::PixelSize,
    "canvas" => Keyword::Canvas,
    "precision" => Keyword::Precision,
    "draw_level" => Keyword::DrawLevel,
    "inner_frame" => Keyword::InnerFrame,
    "pan" => Keyword::Pan,
    "zoom" => Keyword::Zoom,
};

// settings may appear once each, before or between steps
macro_rules! set_once {

    ($seen:expr, $keyword:expr, $dst:expr, $value:expr) => (
        if !$seen.insert($keyword) {
            bail!("{:?} is already set", $keyword);
        } else {
            $dst = $value;
        }
    )

}

impl Default for ViewSpec {

    fn default() -> ViewSpec {
        ViewSpec {
            viewport: Viewport::default(),
            precision: BigInt::from(10).pow(9),
            draw_level: 0,
            inner_frame: (0.2, 0.8),
            steps: Vec::new(),
        }
    }

}

impl ViewSpec {

    pub fn parse<R: BufRead>(filename: &str, reader: &mut R) -> Result<ViewSpec> {

        let mut spec = ViewSpec::default();
        let mut seen = std::collections::HashSet::new();

        let mut lineno = 0;

        loop {

            let mut line = String::new();
            lineno += 1;

            let len = reader.read_line(&mut line)
                .chain_err(|| format!("{:}:{:}: read error", filename, lineno))?;

            if len == 0 {
                break;
            }

            spec.update_from(&mut seen, &line)
                .chain_err(|| format!("{:}:{:}: bad line", filename, lineno))?;

        }

        Ok(spec)

    }

    pub fn parse_str(text: &str) -> Result<ViewSpec> {
        Self::parse("<string>", &mut text.as_bytes())
    }

    fn update_from(&mut self,
                   seen: &mut std::collections::HashSet<Keyword>,
                   line: &str) -> Result<()> {

        let mut trimmed = line.trim();

        if let Some(pos) = trimmed.find('#') {
            trimmed = &trimmed[0..pos];
        }

        let tokens: Vec<&str> = trimmed.split_whitespace().collect();

        if tokens.is_empty() {
            return Ok(());
        }

        let keyword = tokens[0];
        let rest = &tokens[1..];

        self.parse_keyword(seen, keyword, rest)
            .chain_err(|| format!("while parsing keyword {:}", keyword))

    }

    fn parse_keyword(&mut self,
                     seen: &mut std::collections::HashSet<Keyword>,
                     keyword: &str,
                     rest: &[&str]) -> Result<()> {

        let kw = match KEYWORDS.get(keyword) {
            Some(&kw) => kw,
            None => bail!("unrecognized keyword"),
        };

        match kw {

            Keyword::Center => {
                let (x, y) = parse_tokens!(rest, { x: Rational, y: Rational })?;
                set_once!(seen, kw, self.viewport.center_x, x);
                self.viewport.center_y = y;
            }

            Keyword::PixelSize => {
                let size = parse_tokens!(rest, { size: Rational })?;
                if size <= Rational::zero() {
                    bail!("pixel size must be positive");
                }
                set_once!(seen, kw, self.viewport.pixel_size, size);
            }

            Keyword::Canvas => {
                let (width, height) = parse_tokens!(rest, { width: u32, height: u32 })?;
                if width == 0 || height == 0 {
                    bail!("canvas must be at least one pixel");
                }
                set_once!(seen, kw, self.viewport.width, width);
                self.viewport.height = height;
            }

            Keyword::Precision => {
                let digits = parse_tokens!(rest, { digits: u32 })?;
                set_once!(seen, kw, self.precision, BigInt::from(10).pow(digits));
            }

            Keyword::DrawLevel => {
                let level = parse_tokens!(rest, { level: usize })?;
                set_once!(seen, kw, self.draw_level, level);
            }

            Keyword::InnerFrame => {
                let (lo, hi) = parse_tokens!(rest, { lo: f64, hi: f64 })?;
                if !(0.0 <= lo && lo < hi && hi <= 1.0) {
                    bail!("inner frame must satisfy 0 <= lo < hi <= 1");
                }
                set_once!(seen, kw, self.inner_frame, (lo, hi));
            }

            Keyword::Pan => {
                let (dx, dy) = parse_tokens!(rest, { dx: i64, dy: i64 })?;
                self.steps.push(Step::Pan(dx, dy));
            }

            Keyword::Zoom => {

                // optional repeat count folds into a single step
                let (factor, times) = if rest.len() == 2 {
                    parse_tokens!(rest, { factor: Rational, times: u32 })?
                } else {
                    (parse_tokens!(rest, { factor: Rational })?, 1)
                };

                if factor <= Rational::zero() {
                    bail!("zoom factor must be positive");
                }

                if times == 0 {
                    bail!("zoom repeat count must be at least 1");
                }

                self.steps.push(Step::Zoom(factor.pow(times)));

            }

        }

        Ok(())

    }

    /// Initial viewport followed by the viewport after each step.
    pub fn viewports(&self) -> Result<Vec<Viewport>> {

        let mut current = self.viewport.clone();
        let mut rval = vec![current.clone()];

        for step in &self.steps {
            current.apply(step)?;
            rval.push(current.clone());
        }

        Ok(rval)

    }

}
