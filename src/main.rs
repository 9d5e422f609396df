// bunch of standard library stuff
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

extern crate cairo;

use tracing::{debug, info};

use penrose_exact::penrose::{Orientation, Shape};
use penrose_exact::{approx_triangle, BBox, HalfTile, PenroseTree, Point2d, State, ViewSpec, Viewport};

//////////////////////////////////////////////////////////////////////
// use error chain so we can use Result<> everywhere
// for error handling

#[macro_use]
extern crate error_chain;

mod errors {

    error_chain!{

        links {
            Tiling(::penrose_exact::errors::Error, ::penrose_exact::errors::ErrorKind);
        }

        foreign_links {
            Fmt(::std::fmt::Error);
            Io(::std::io::Error);
            Cairo(::cairo::Error);
        }

    }

}

use errors::*;

//////////////////////////////////////////////////////////////////////
// constants for layout

const INCH: f64 = 72.0;

const PAGE_SHORT_EDGE: f64 = 8.5 * INCH;
const PAGE_LONG_EDGE: f64 = 11.0 * INCH;

const MARGIN: f64 = 0.5 * INCH;

// indexed by shape then orientation
const COLORS: [[f64; 3]; 4] = [
    [0.55, 0.70, 0.95], // XL
    [0.35, 0.50, 0.85], // XR
    [0.98, 0.85, 0.45], // YL
    [0.90, 0.65, 0.30], // YR
];

const PARTIAL_ALPHA: f64 = 0.6;

//////////////////////////////////////////////////////////////////////
// pull in some types from nalgebra

type Vec2d = nalgebra::Vector2<f64>;
type Translation2d = nalgebra::Translation2<f64>;
type Transform2d = nalgebra::Transform2<f64>;
type Matrix3d = nalgebra::Matrix3<f64>;

//////////////////////////////////////////////////////////////////////
// convenience drawing methods taking nalgebra points

trait CairoVecOps {

    fn moveto(&self, p: &Point2d);
    fn lineto(&self, p: &Point2d);
    fn setcolor(&self, rgb: &[f64; 3]);
    fn drawtri(&self, p: &[Point2d; 3]);
    fn drawpoly(&self, poly: &[Point2d]);

}

impl CairoVecOps for cairo::Context {

    fn moveto(&self, p: &Point2d) {
        self.move_to(p.x, p.y);
    }

    fn lineto(&self, p: &Point2d) {
        self.line_to(p.x, p.y);
    }

    fn setcolor(&self, rgb: &[f64; 3]) {
        self.set_source_rgb(rgb[0], rgb[1], rgb[2]);
    }

    fn drawtri(&self, p: &[Point2d; 3]) {
        self.moveto(&p[0]);
        self.lineto(&p[1]);
        self.lineto(&p[2]);
        self.close_path();
    }

    fn drawpoly(&self, poly: &[Point2d]) {

        if let Some((first, rest)) = poly.split_first() {

            self.moveto(first);

            for p in rest {
                self.lineto(p);
            }

            self.close_path();

        }

    }

}

//////////////////////////////////////////////////////////////////////
// save & restore the cairo context around a block

macro_rules! with_save_restore {

    ($ctx:ident, { $($tree:tt)* }) => {

        $ctx.save();

        {
            $($tree)*
        }

        $ctx.restore();

    }

}

//////////////////////////////////////////////////////////////////////
// where the unit square of the viewport lands on the page

struct PageLayout {
    transform: Transform2d, // unit square -> page points
    page_min:  Point2d,     // printable area
    page_dims: Vec2d,
}

impl PageLayout {

    fn new(vp: &Viewport, inner_frame: (f64, f64)) -> PageLayout {

        let page_min = Point2d::new(MARGIN, MARGIN);
        let page_dims = Vec2d::new(PAGE_SHORT_EDGE - 2.0 * MARGIN,
                                   PAGE_LONG_EDGE - 2.0 * MARGIN);

        let (lo, hi) = inner_frame;

        // keep the canvas aspect ratio inside the inner frame
        let canvas = Vec2d::new(vp.width as f64, vp.height as f64);
        let scl = (hi - lo) * page_dims.component_div(&canvas).min();

        let dims = canvas * scl;

        let mid = page_min + page_dims * (0.5 * (lo + hi));

        let scale = Transform2d::from_matrix_unchecked(
            Matrix3d::new(
                dims.x, 0.0, 0.0,
                0.0, -dims.y, 0.0,
                0.0, 0.0, 1.0
            )
        );

        let transform = Translation2d::new(mid.x, mid.y)
            * scale
            * Translation2d::new(-0.5, -0.5);

        PageLayout {
            transform: transform,
            page_min: page_min,
            page_dims: page_dims,
        }

    }

    fn map(&self, p: &Point2d) -> Point2d {
        self.transform * *p
    }

    fn clip(&self, ctx: &cairo::Context) {
        ctx.rectangle(self.page_min.x, self.page_min.y, self.page_dims.x, self.page_dims.y);
        ctx.clip();
    }

}

fn tile_color(tile: &HalfTile) -> [f64; 3] {

    let kind = tile.kind();

    let shape = match kind.shape {
        Shape::X => 0,
        Shape::Y => 1,
    };

    let orientation = match kind.orientation {
        Orientation::L => 0,
        Orientation::R => 1,
    };

    COLORS[2 * shape + orientation]

}

//////////////////////////////////////////////////////////////////////
// draw one page for a single viewport

fn draw_view(ctx: &cairo::Context,
             tree: &PenroseTree,
             frame: &BBox,
             vp: &Viewport,
             spec: &ViewSpec) -> Result<()> {

    let layout = PageLayout::new(vp, spec.inner_frame);

    let mut filled = 0;

    with_save_restore!(ctx, {

        layout.clip(ctx);

        ctx.set_line_join(cairo::LineJoin::Round);
        ctx.set_line_width(0.5);

        for tile in tree.tiles(spec.draw_level) {

            let points = approx_triangle(tile.triangle(), frame, &spec.precision)?;
            let points = [layout.map(&points[0]), layout.map(&points[1]), layout.map(&points[2])];

            let rgb = tile_color(tile);

            let alpha = if tile.state == State::Full { 1.0 } else { PARTIAL_ALPHA };

            ctx.drawtri(&points);
            ctx.set_source_rgba(rgb[0], rgb[1], rgb[2], alpha);
            ctx.fill_preserve();
            ctx.setcolor(&[0.0, 0.0, 0.0]);
            ctx.stroke();

            filled += 1;

        }

        // parents, dashed, to show the substitution structure
        if spec.draw_level < tree.level() * 8 {

            ctx.set_dash(&[3.0, 2.0], 0.0);
            ctx.set_line_width(0.75);
            ctx.setcolor(&[0.3, 0.3, 0.3]);

            for tri in tree.triangles(spec.draw_level + 1) {
                let points = approx_triangle(tri, frame, &spec.precision)?;
                ctx.drawpoly(&points.iter().map(|p| layout.map(p)).collect::<Vec<_>>());
                ctx.stroke();
            }

        }

    });

    with_save_restore!(ctx, {

        let corners: Vec<Point2d> = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]
            .iter()
            .map(|&(x, y)| layout.map(&Point2d::new(x, y)))
            .collect();

        ctx.set_line_width(1.5);
        ctx.setcolor(&[0.0, 0.6, 0.0]);
        ctx.drawpoly(&corners);
        ctx.stroke();

        ctx.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Normal);
        ctx.set_font_size(9.0);
        ctx.setcolor(&[0.0, 0.0, 0.0]);
        ctx.move_to(MARGIN, PAGE_LONG_EDGE - 0.5 * MARGIN);
        ctx.show_text(&format!("level {}: {}", tree.level(), vp.describe()));

    });

    debug!(tiles = filled, "drew page");

    Ok(())

}

//////////////////////////////////////////////////////////////////////

fn run() -> Result<()> {

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() != 2 {
        eprintln!("usage: {:?} VIEWFILE", args[0]);
        std::process::exit(1);
    }

    let filename = Path::new(&args[1]);

    let basename = match filename.file_stem() {
        None => "output",
        Some(os_str) => os_str.to_str().unwrap_or("output")
    };

    let pdffile = basename.to_owned() + ".pdf";

    let f = File::open(filename)?;
    let mut reader = BufReader::new(f);

    let spec = ViewSpec::parse(&args[1], &mut reader)?;

    let viewports = spec.viewports()?;

    //////////////////////////////////////////////////////////////////////

    let surface = cairo::PdfSurface::new(PAGE_SHORT_EDGE, PAGE_LONG_EDGE, &pdffile)?;

    let ctx = cairo::Context::new(&surface);

    // viewports() always starts with the initial view
    let mut tree = PenroseTree::new(&viewports[0].bbox(&spec.precision));

    for (i, vp) in viewports.iter().enumerate() {

        let frame = vp.bbox(&spec.precision);

        if i > 0 {
            tree.update(&frame)?;
        }

        let stats = tree.last_refine();

        info!(page = i + 1, level = tree.level(),
              visited = stats.visited, classified = stats.classified,
              "{}", vp.describe());

        draw_view(&ctx, &tree, &frame, vp, &spec)?;

        ctx.show_page();

    }

    println!("wrote {:}", pdffile);

    Ok(())

}

quick_main!(run);
