//! This module represents general shape style information.

/// An RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    rgba: u32,
}

impl Color {
    pub fn new(rgba: u32) -> Self {
        Self { rgba }
    }

    pub fn transparent() -> Self {
        Self { rgba: 0 }
    }

    /// \returns the color for one of the few web color names that the
    /// renderers use. Unknown names are black.
    pub fn fast(name: &str) -> Self {
        let rgb = match name {
            "white" => 0xffffff,
            "red" => 0xff0000,
            "green" => 0x008000,
            "blue" => 0x0000ff,
            "orange" => 0xffa500,
            "purple" => 0x800080,
            "gray" => 0x808080,
            "pink" => 0xffc0cb,
            "aliceblue" => 0xf0f8ff,
            "lightyellow" => 0xffffe0,
            _ => 0x000000,
        };
        Self {
            rgba: (rgb << 8) | 0xff,
        }
    }

    pub fn to_web_color(&self) -> String {
        format!("#{:08x}", self.rgba)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LineStyleKind {
    Normal,
    Dashed,
}

#[derive(Clone, Debug)]
pub struct StyleAttr {
    pub line_color: Color,
    pub line_width: usize,
    pub line_style: LineStyleKind,
    pub fill_color: Option<Color>,
    pub font_size: usize,
}

impl StyleAttr {
    pub fn new(
        line_color: Color,
        line_width: usize,
        fill_color: Option<Color>,
        font_size: usize,
    ) -> Self {
        Self {
            line_color,
            line_width,
            line_style: LineStyleKind::Normal,
            fill_color,
            font_size,
        }
    }

    pub fn simple() -> Self {
        StyleAttr::new(
            Color::fast("black"),
            2,
            Option::Some(Color::fast("white")),
            15,
        )
    }

    /// A thin line in the color \p name.
    pub fn line(name: &str) -> Self {
        StyleAttr::new(Color::fast(name), 1, None, 10)
    }

    pub fn dashed(mut self) -> Self {
        self.line_style = LineStyleKind::Dashed;
        self
    }

    pub fn debug0() -> Self {
        StyleAttr::new(
            Color::fast("black"),
            1,
            Option::Some(Color::fast("pink")),
            10,
        )
    }

    pub fn debug1() -> Self {
        StyleAttr::new(
            Color::fast("black"),
            1,
            Option::Some(Color::fast("aliceblue")),
            10,
        )
    }
}

#[test]
fn test_colors() {
    assert_eq!(Color::fast("red").to_web_color(), "#ff0000ff");
    assert_eq!(Color::fast("no-such-color").to_web_color(), "#000000ff");
    assert_eq!(Color::transparent().to_web_color(), "#00000000");
}
