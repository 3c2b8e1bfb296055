//! Overlay drawing.
//!
//! All functions return a guard that draws when dropped and can be used to customize the
//! primitive's appearance before that.

use std::convert::Infallible;

use embedded_graphics::{
    draw_target::DrawTarget,
    mono_font::{ascii, MonoTextStyle},
    prelude::*,
    primitives::{self, Line, PrimitiveStyle},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};
use nalgebra::Point2;

use super::{Color, Image, Rect};

/// Guard returned by [`line`][line()]; draws the line when dropped.
pub struct DrawLine<'a> {
    image: &'a mut Image,
    start: Point2<i32>,
    end: Point2<i32>,
    color: Color,
    stroke_width: u32,
}

impl<'a> DrawLine<'a> {
    /// Sets the line's color.
    pub fn color(&mut self, color: Color) -> &mut Self {
        self.color = color;
        self
    }

    /// Sets the line's stroke width.
    ///
    /// By default, a stroke width of 1 is used.
    pub fn stroke_width(&mut self, width: u32) -> &mut Self {
        self.stroke_width = width;
        self
    }
}

impl Drop for DrawLine<'_> {
    fn drop(&mut self) {
        match Line::new(
            Point::new(self.start.x, self.start.y),
            Point::new(self.end.x, self.end.y),
        )
        .into_styled(PrimitiveStyle::with_stroke(self.color, self.stroke_width))
        .draw(&mut Target(&mut *self.image))
        {
            Ok(_) => {}
            Err(infallible) => match infallible {},
        }
    }
}

/// Draws a line between two points onto an image.
pub fn line(image: &mut Image, start: Point2<i32>, end: Point2<i32>) -> DrawLine<'_> {
    DrawLine {
        image,
        start,
        end,
        color: Color::GREEN,
        stroke_width: 1,
    }
}

/// Guard returned by [`marker`]; draws an X-shaped marker when dropped.
pub struct DrawMarker<'a> {
    image: &'a mut Image,
    pos: Point2<i32>,
    color: Color,
    size: u32,
}

impl<'a> DrawMarker<'a> {
    /// Sets the marker's color.
    pub fn color(&mut self, color: Color) -> &mut Self {
        self.color = color;
        self
    }

    /// Sets the width and height of the marker.
    ///
    /// The default size is 5. The size must be *uneven* and *non-zero*. A size of 1 will result
    /// in a single pixel getting drawn.
    pub fn size(&mut self, size: u32) -> &mut Self {
        assert!(size != 0, "marker size must be greater than zero");
        assert!(size % 2 == 1, "marker size must be an uneven number");
        self.size = size;
        self
    }
}

impl Drop for DrawMarker<'_> {
    fn drop(&mut self) {
        let offset = ((self.size - 1) / 2) as i32;
        for (xoff, yoff) in (-offset..=offset)
            .zip(-offset..=offset)
            .chain((-offset..=offset).rev().zip(-offset..=offset))
        {
            match Pixel(
                Point {
                    x: self.pos.x + xoff,
                    y: self.pos.y + yoff,
                },
                self.color,
            )
            .draw(&mut Target(&mut *self.image))
            {
                Ok(_) => {}
                Err(infallible) => match infallible {},
            }
        }
    }
}

/// Draws a small X-shaped marker at a point.
pub fn marker(image: &mut Image, pos: Point2<i32>) -> DrawMarker<'_> {
    DrawMarker {
        image,
        pos,
        color: Color::RED,
        size: 5,
    }
}

/// Guard returned by [`circle`]; draws the circle when dropped.
pub struct DrawCircle<'a> {
    image: &'a mut Image,
    center: Point2<i32>,
    diameter: u32,
    style: PrimitiveStyle<Color>,
}

impl<'a> DrawCircle<'a> {
    /// Sets the circle's color.
    pub fn color(&mut self, color: Color) -> &mut Self {
        match self.style.fill_color {
            Some(_) => self.style = PrimitiveStyle::with_fill(color),
            None => self.style = PrimitiveStyle::with_stroke(color, self.style.stroke_width),
        }
        self
    }

    /// Fills the circle instead of only drawing its outline.
    pub fn fill(&mut self) -> &mut Self {
        let color = self.style.stroke_color.or(self.style.fill_color).unwrap();
        self.style = PrimitiveStyle::with_fill(color);
        self
    }
}

impl Drop for DrawCircle<'_> {
    fn drop(&mut self) {
        let top_left = Point {
            x: self.center.x - (self.diameter / 2) as i32,
            y: self.center.y - (self.diameter / 2) as i32,
        };
        match (primitives::Circle {
            top_left,
            diameter: self.diameter,
        })
        .into_styled(self.style)
        .draw(&mut Target(&mut *self.image))
        {
            Ok(_) => {}
            Err(infallible) => match infallible {},
        }
    }
}

/// Draws a circle around a center point.
pub fn circle(image: &mut Image, center: Point2<i32>, diameter: u32) -> DrawCircle<'_> {
    DrawCircle {
        image,
        center,
        diameter,
        style: PrimitiveStyle::with_stroke(Color::MAGENTA, 1),
    }
}

/// Guard returned by [`rect`]; draws the rectangle when dropped.
pub struct DrawRect<'a> {
    image: &'a mut Image,
    rect: Rect,
    style: PrimitiveStyle<Color>,
}

impl<'a> DrawRect<'a> {
    /// Sets the rectangle's color.
    pub fn color(&mut self, color: Color) -> &mut Self {
        match self.style.fill_color {
            Some(_) => self.style = PrimitiveStyle::with_fill(color),
            None => self.style = PrimitiveStyle::with_stroke(color, self.style.stroke_width),
        }
        self
    }

    /// Sets the rectangle's stroke width.
    ///
    /// By default, a stroke width of 1 is used.
    pub fn stroke_width(&mut self, width: u32) -> &mut Self {
        let color = self.style.stroke_color.or(self.style.fill_color).unwrap();
        self.style = PrimitiveStyle::with_stroke(color, width);
        self
    }

    /// Fills the rectangle instead of only drawing its outline.
    pub fn fill(&mut self) -> &mut Self {
        let color = self.style.stroke_color.or(self.style.fill_color).unwrap();
        self.style = PrimitiveStyle::with_fill(color);
        self
    }
}

impl Drop for DrawRect<'_> {
    fn drop(&mut self) {
        match (primitives::Rectangle {
            top_left: Point::new(self.rect.x(), self.rect.y()),
            size: Size::new(self.rect.width(), self.rect.height()),
        })
        .into_styled(self.style)
        .draw(&mut Target(&mut *self.image))
        {
            Ok(_) => {}
            Err(infallible) => match infallible {},
        }
    }
}

/// Draws a rectangle onto an image.
pub fn rect(image: &mut Image, rect: Rect) -> DrawRect<'_> {
    DrawRect {
        image,
        rect,
        style: PrimitiveStyle::with_stroke(Color::GREEN, 1),
    }
}

/// Guard returned by [`text`]; draws the text when dropped.
pub struct DrawText<'a> {
    image: &'a mut Image,
    pos: Point2<i32>,
    text: &'a str,
    color: Color,
    large: bool,
    alignment: Alignment,
    baseline: Baseline,
}

impl<'a> DrawText<'a> {
    /// Sets the text color.
    pub fn color(&mut self, color: Color) -> &mut Self {
        self.color = color;
        self
    }

    /// Renders the text with a larger font (10x20 instead of 6x10).
    pub fn large(&mut self) -> &mut Self {
        self.large = true;
        self
    }

    /// Aligns the top of the text with the `y` coordinate.
    pub fn align_top(&mut self) -> &mut Self {
        self.baseline = Baseline::Top;
        self
    }

    /// Aligns the bottom of the text with the `y` coordinate.
    pub fn align_bottom(&mut self) -> &mut Self {
        self.baseline = Baseline::Bottom;
        self
    }

    /// Aligns the left side of the text with the `x` coordinate.
    pub fn align_left(&mut self) -> &mut Self {
        self.alignment = Alignment::Left;
        self
    }

    /// Aligns the right side of the text with the `x` coordinate.
    pub fn align_right(&mut self) -> &mut Self {
        self.alignment = Alignment::Right;
        self
    }
}

impl Drop for DrawText<'_> {
    fn drop(&mut self) {
        let font = if self.large {
            &ascii::FONT_10X20
        } else {
            &ascii::FONT_6X10
        };
        let character_style = MonoTextStyle::new(font, self.color);
        let text_style = TextStyleBuilder::new()
            .alignment(self.alignment)
            .baseline(self.baseline)
            .build();
        match Text::with_text_style(
            self.text,
            Point::new(self.pos.x, self.pos.y),
            character_style,
            text_style,
        )
        .draw(&mut Target(&mut *self.image))
        {
            Ok(_) => {}
            Err(infallible) => match infallible {},
        }
    }
}

/// Draws a text string centered at a position.
pub fn text<'a>(image: &'a mut Image, pos: Point2<i32>, text: &'a str) -> DrawText<'a> {
    DrawText {
        image,
        pos,
        text,
        color: Color::WHITE,
        large: false,
        alignment: Alignment::Center,
        baseline: Baseline::Middle,
    }
}

struct Target<'a>(&'a mut Image);

impl Dimensions for Target<'_> {
    fn bounding_box(&self) -> primitives::Rectangle {
        primitives::Rectangle {
            top_left: Point { x: 0, y: 0 },
            size: Size {
                width: self.0.width(),
                height: self.0.height(),
            },
        }
    }
}

impl DrawTarget for Target<'_> {
    type Color = Color;

    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = embedded_graphics::Pixel<Self::Color>>,
    {
        for pixel in pixels {
            if pixel.0.x >= 0
                && (pixel.0.x as u32) < self.0.width()
                && pixel.0.y >= 0
                && (pixel.0.y as u32) < self.0.height()
            {
                self.0.set(pixel.0.x as _, pixel.0.y as _, pixel.1);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filled_rect_covers_pixels() {
        let mut image = Image::new(8, 8);
        rect(&mut image, Rect::from_top_left(1, 1, 3, 3))
            .color(Color::CYAN)
            .fill();
        assert_eq!(image.get(1, 1), Color::CYAN);
        assert_eq!(image.get(3, 3), Color::CYAN);
        assert_eq!(image.get(4, 4), Color::from_rgba8(0, 0, 0, 0));
    }

    #[test]
    fn drawing_off_image_is_clipped() {
        let mut image = Image::new(4, 4);
        line(
            &mut image,
            Point2::new(-10, -10),
            Point2::new(10, 10),
        )
        .color(Color::WHITE);
        assert_eq!(image.get(0, 0), Color::WHITE);
        assert_eq!(image.get(3, 3), Color::WHITE);
    }
}
