//! The raster target the engine paints on.
//!
//! [`Surface`] mirrors the subset of the Canvas 2D API the renderer needs.
//! `WebSurface` (wasm32 only) forwards to a browser canvas; [`RecordingSurface`]
//! records calls for headless use.

/// A 2D drawing context.
pub trait Surface {
	/// Decoded image handle.
	type Image;

	/// Current pixel size of the drawable area.
	fn size(&self) -> (f64, f64);

	/// Matches the backing store to the on-screen size and returns it.
	fn fit(&mut self) -> (f64, f64) {
		self.size()
	}

	fn save(&mut self);
	fn restore(&mut self);
	fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64);
	fn translate(&mut self, x: f64, y: f64);
	fn scale(&mut self, k: f64);

	fn begin_path(&mut self);
	fn move_to(&mut self, x: f64, y: f64);
	fn line_to(&mut self, x: f64, y: f64);
	fn arc(&mut self, x: f64, y: f64, r: f64, start: f64, end: f64, anticlockwise: bool);
	fn rect(&mut self, x: f64, y: f64, w: f64, h: f64);
	fn fill(&mut self);
	fn stroke(&mut self);
	fn clip(&mut self);

	fn set_fill_style(&mut self, color: &str);
	fn set_stroke_style(&mut self, color: &str);
	fn set_line_width(&mut self, width: f64);

	/// CSS font shorthand, e.g. `"1.75px sans-serif"`.
	fn set_font(&mut self, font: &str);
	/// Centers text horizontally and vertically on the anchor point.
	fn center_text(&mut self);
	fn fill_text(&mut self, text: &str, x: f64, y: f64);
	fn measure_text(&mut self, text: &str) -> f64;

	/// Starts loading `src`. `None` if the surface cannot load images.
	fn load_image(&mut self, src: &str) -> Option<Self::Image>;
	/// Natural size once decoded, `None` while still loading.
	fn image_size(&self, image: &Self::Image) -> Option<(f64, f64)>;
	#[allow(clippy::too_many_arguments)]
	fn draw_image(
		&mut self,
		image: &Self::Image,
		sx: f64,
		sy: f64,
		sw: f64,
		sh: f64,
		dx: f64,
		dy: f64,
		dw: f64,
		dh: f64,
	);
}

/// One recorded surface call.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
	Save,
	Restore,
	ClearRect(f64, f64, f64, f64),
	Translate(f64, f64),
	Scale(f64),
	BeginPath,
	MoveTo(f64, f64),
	LineTo(f64, f64),
	Arc { x: f64, y: f64, r: f64 },
	Rect(f64, f64, f64, f64),
	Fill(String),
	Stroke(String),
	Clip,
	Font(String),
	Text { text: String, x: f64, y: f64 },
	Image { src: String, dx: f64, dy: f64, dw: f64, dh: f64 },
}

/// An image known to a [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedImage {
	/// Source the image was requested with.
	pub src: String,
}

/// Headless surface that records every call.
///
/// Images listed with [`RecordingSurface::mark_loaded`] report a size;
/// all others stay "loading". Text is measured at `0.5em` per character.
#[derive(Clone, Debug)]
pub struct RecordingSurface {
	width: f64,
	height: f64,
	fill_style: String,
	stroke_style: String,
	font_size: f64,
	loaded: Vec<(String, f64, f64)>,
	/// Drawing calls, in call order.
	pub commands: Vec<Command>,
	/// Sources passed to [`Surface::load_image`], in call order.
	pub requested_images: Vec<String>,
}

impl RecordingSurface {
	/// Surface reporting a fixed `width` by `height` CSS-pixel size.
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			width,
			height,
			fill_style: String::new(),
			stroke_style: String::new(),
			font_size: 10.0,
			loaded: Vec::new(),
			commands: Vec::new(),
			requested_images: Vec::new(),
		}
	}

	/// Changes the reported size, as a browser resize would.
	pub fn set_size(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	/// Makes `src` report as decoded with the given natural size.
	pub fn mark_loaded(&mut self, src: impl Into<String>, width: f64, height: f64) {
		self.loaded.push((src.into(), width, height));
	}

	/// Forgets recorded commands.
	pub fn take_commands(&mut self) -> Vec<Command> {
		std::mem::take(&mut self.commands)
	}

	/// Number of `fill` calls made with `color`.
	pub fn fills_with(&self, color: &str) -> usize {
		self.commands
			.iter()
			.filter(|c| matches!(c, Command::Fill(style) if style == color))
			.count()
	}

	/// Texts drawn so far.
	pub fn texts(&self) -> Vec<&str> {
		self.commands
			.iter()
			.filter_map(|c| match c {
				Command::Text { text, .. } => Some(text.as_str()),
				_ => None,
			})
			.collect()
	}
}

impl Surface for RecordingSurface {
	type Image = RecordedImage;

	fn size(&self) -> (f64, f64) {
		(self.width, self.height)
	}

	fn save(&mut self) {
		self.commands.push(Command::Save);
	}

	fn restore(&mut self) {
		self.commands.push(Command::Restore);
	}

	fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
		self.commands.push(Command::ClearRect(x, y, w, h));
	}

	fn translate(&mut self, x: f64, y: f64) {
		self.commands.push(Command::Translate(x, y));
	}

	fn scale(&mut self, k: f64) {
		self.commands.push(Command::Scale(k));
	}

	fn begin_path(&mut self) {
		self.commands.push(Command::BeginPath);
	}

	fn move_to(&mut self, x: f64, y: f64) {
		self.commands.push(Command::MoveTo(x, y));
	}

	fn line_to(&mut self, x: f64, y: f64) {
		self.commands.push(Command::LineTo(x, y));
	}

	fn arc(&mut self, x: f64, y: f64, r: f64, _start: f64, _end: f64, _anticlockwise: bool) {
		self.commands.push(Command::Arc { x, y, r });
	}

	fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
		self.commands.push(Command::Rect(x, y, w, h));
	}

	fn fill(&mut self) {
		self.commands.push(Command::Fill(self.fill_style.clone()));
	}

	fn stroke(&mut self) {
		self.commands.push(Command::Stroke(self.stroke_style.clone()));
	}

	fn clip(&mut self) {
		self.commands.push(Command::Clip);
	}

	fn set_fill_style(&mut self, color: &str) {
		self.fill_style = color.to_owned();
	}

	fn set_stroke_style(&mut self, color: &str) {
		self.stroke_style = color.to_owned();
	}

	fn set_line_width(&mut self, _width: f64) {}

	fn set_font(&mut self, font: &str) {
		self.font_size = font
			.split("px")
			.next()
			.and_then(|size| size.trim().parse().ok())
			.unwrap_or(10.0);
		self.commands.push(Command::Font(font.to_owned()));
	}

	fn center_text(&mut self) {}

	fn fill_text(&mut self, text: &str, x: f64, y: f64) {
		self.commands.push(Command::Text {
			text: text.to_owned(),
			x,
			y,
		});
	}

	fn measure_text(&mut self, text: &str) -> f64 {
		text.chars().count() as f64 * self.font_size * 0.5
	}

	fn load_image(&mut self, src: &str) -> Option<RecordedImage> {
		self.requested_images.push(src.to_owned());
		Some(RecordedImage { src: src.to_owned() })
	}

	fn image_size(&self, image: &RecordedImage) -> Option<(f64, f64)> {
		self.loaded
			.iter()
			.find(|(src, ..)| *src == image.src)
			.map(|&(_, w, h)| (w, h))
	}

	fn draw_image(
		&mut self,
		image: &RecordedImage,
		_sx: f64,
		_sy: f64,
		_sw: f64,
		_sh: f64,
		dx: f64,
		dy: f64,
		dw: f64,
		dh: f64,
	) {
		self.commands.push(Command::Image {
			src: image.src.clone(),
			dx,
			dy,
			dw,
			dh,
		});
	}
}

#[cfg(target_arch = "wasm32")]
pub use web::WebSurface;

#[cfg(target_arch = "wasm32")]
mod web {
	use wasm_bindgen::JsCast;
	use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

	use super::Surface;
	use crate::error::Error;

	/// A browser `<canvas>` and its 2D context.
	pub struct WebSurface {
		canvas: HtmlCanvasElement,
		ctx: CanvasRenderingContext2d,
	}

	impl WebSurface {
		/// Acquires the 2D context of `canvas`.
		pub fn new(canvas: HtmlCanvasElement) -> Result<Self, Error> {
			let ctx = canvas
				.get_context("2d")
				.map_err(Error::from_js)?
				.ok_or(Error::ContextUnavailable)?
				.dyn_into::<CanvasRenderingContext2d>()
				.map_err(|_| Error::ContextUnavailable)?;
			Ok(Self { canvas, ctx })
		}

		/// The canvas being painted.
		pub fn canvas(&self) -> &HtmlCanvasElement {
			&self.canvas
		}
	}

	impl Surface for WebSurface {
		type Image = HtmlImageElement;

		fn size(&self) -> (f64, f64) {
			(self.canvas.width() as f64, self.canvas.height() as f64)
		}

		fn fit(&mut self) -> (f64, f64) {
			let rect = self.canvas.get_bounding_client_rect();
			self.canvas.set_width(rect.width() as u32);
			self.canvas.set_height(rect.height() as u32);
			self.size()
		}

		fn save(&mut self) {
			self.ctx.save();
		}

		fn restore(&mut self) {
			self.ctx.restore();
		}

		fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
			self.ctx.clear_rect(x, y, w, h);
		}

		fn translate(&mut self, x: f64, y: f64) {
			let _ = self.ctx.translate(x, y);
		}

		fn scale(&mut self, k: f64) {
			let _ = self.ctx.scale(k, k);
		}

		fn begin_path(&mut self) {
			self.ctx.begin_path();
		}

		fn move_to(&mut self, x: f64, y: f64) {
			self.ctx.move_to(x, y);
		}

		fn line_to(&mut self, x: f64, y: f64) {
			self.ctx.line_to(x, y);
		}

		fn arc(&mut self, x: f64, y: f64, r: f64, start: f64, end: f64, anticlockwise: bool) {
			let _ = self
				.ctx
				.arc_with_anticlockwise(x, y, r, start, end, anticlockwise);
		}

		fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
			self.ctx.rect(x, y, w, h);
		}

		fn fill(&mut self) {
			self.ctx.fill();
		}

		fn stroke(&mut self) {
			self.ctx.stroke();
		}

		fn clip(&mut self) {
			self.ctx.clip();
		}

		fn set_fill_style(&mut self, color: &str) {
			self.ctx.set_fill_style_str(color);
		}

		fn set_stroke_style(&mut self, color: &str) {
			self.ctx.set_stroke_style_str(color);
		}

		fn set_line_width(&mut self, width: f64) {
			self.ctx.set_line_width(width);
		}

		fn set_font(&mut self, font: &str) {
			self.ctx.set_font(font);
		}

		fn center_text(&mut self) {
			self.ctx.set_text_align("center");
			self.ctx.set_text_baseline("middle");
		}

		fn fill_text(&mut self, text: &str, x: f64, y: f64) {
			let _ = self.ctx.fill_text(text, x, y);
		}

		fn measure_text(&mut self, text: &str) -> f64 {
			self.ctx
				.measure_text(text)
				.map(|metrics| metrics.width())
				.unwrap_or(0.0)
		}

		fn load_image(&mut self, src: &str) -> Option<HtmlImageElement> {
			let image = HtmlImageElement::new().ok()?;
			image.set_src(src);
			Some(image)
		}

		fn image_size(&self, image: &HtmlImageElement) -> Option<(f64, f64)> {
			let (w, h) = (image.natural_width(), image.natural_height());
			(image.complete() && w > 0 && h > 0).then(|| (w as f64, h as f64))
		}

		fn draw_image(
			&mut self,
			image: &HtmlImageElement,
			sx: f64,
			sy: f64,
			sw: f64,
			sh: f64,
			dx: f64,
			dy: f64,
			dw: f64,
			dh: f64,
		) {
			let _ = self
				.ctx
				.draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
					image, sx, sy, sw, sh, dx, dy, dw, dh,
				);
		}
	}
}
