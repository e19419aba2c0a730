//! Content stream interpreter recovering filled rectangles and horizontal
//! line segments.
//!
//! The interpreter walks the token sequence once. Only a small operator
//! vocabulary matters for shape geometry: transform concatenation, color
//! setting, graphics state save/restore, rectangle fills and line segments.
//! Everything inside a text object is ignored.

use crate::error::StreamError;
use crate::model::{BBox, Rect, Rgb};

use super::tokenizer::{tokenize, Operator, Token};

/// Scale-and-translate transform. Rotation and skew are not tracked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub sx: f32,
    pub sy: f32,
    pub tx: f32,
    pub ty: f32,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        sx: 1.0,
        sy: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    /// Compose with an incoming `cm` matrix.
    pub fn concat(&self, other: &Transform) -> Transform {
        Transform {
            sx: self.sx * other.sx,
            sy: self.sy * other.sy,
            tx: self.tx + other.tx,
            ty: self.ty + other.ty,
        }
    }

    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (x * self.sx + self.tx, y * self.sy + self.ty)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Interpreter state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Graphics,
    Text,
}

/// Shapes recovered from one content stream.
#[derive(Debug, Clone, Default)]
pub struct StreamShapes {
    /// Shapes in stream order
    pub rects: Vec<Rect>,

    /// Set when interpretation stopped early
    pub error: Option<StreamError>,
}

/// Single-pass shape interpreter over a tokenized content stream.
pub struct StreamInterpreter<'a> {
    tokens: Vec<Token<'a>>,
    page_height: f32,
    origin: (f32, f32),
    line_thickness: f32,
    state: State,
    transform: Transform,
    color: Rgb,
    transforms: Vec<Transform>,
    colors: Vec<Rgb>,
    rects: Vec<Rect>,
}

impl<'a> StreamInterpreter<'a> {
    /// Prepare an interpreter for `stream` on a page of the given height.
    pub fn new(stream: &'a str, page_height: f32, line_thickness: f32) -> Self {
        Self {
            tokens: tokenize(stream),
            page_height,
            origin: (0.0, 0.0),
            line_thickness,
            state: State::Graphics,
            transform: Transform::IDENTITY,
            color: Rgb::BLACK,
            transforms: Vec::new(),
            colors: Vec::new(),
            rects: Vec::new(),
        }
    }

    /// Set the lower-left corner of the media box in user space.
    ///
    /// Shapes are reported relative to the top-left corner of the media box,
    /// matching how annotation rectangles are read.
    pub fn with_origin(mut self, x: f32, y: f32) -> Self {
        self.origin = (x, y);
        self
    }

    /// Run to completion, keeping whatever was found before a malformed token.
    pub fn run(mut self) -> StreamShapes {
        let mut error = None;
        for i in 0..self.tokens.len() {
            if let Err(e) = self.step(i) {
                log::warn!("Stopping shape extraction: {}", e);
                error = Some(e);
                break;
            }
        }

        if !self.transforms.is_empty() {
            log::debug!("{} unclosed save(s) at end of stream", self.transforms.len());
        }

        StreamShapes {
            rects: self.rects,
            error,
        }
    }

    fn step(&mut self, i: usize) -> Result<(), StreamError> {
        let Some(op) = self.tokens[i].operator() else {
            return Ok(());
        };

        match (self.state, op) {
            (State::Text, Operator::EndText) => self.state = State::Graphics,
            (State::Text, _) => {}
            (State::Graphics, Operator::BeginText) => self.state = State::Text,
            (State::Graphics, Operator::ConcatMatrix) => {
                let m = Transform {
                    sx: self.operand(i, 6)?,
                    sy: self.operand(i, 3)?,
                    tx: self.operand(i, 2)?,
                    ty: self.operand(i, 1)?,
                };
                self.transform = self.transform.concat(&m);
            }
            (State::Graphics, Operator::SetGray) => {
                self.color = Rgb::from_gray(self.operand(i, 1)?);
            }
            (State::Graphics, Operator::SetRgb) => {
                let r = self.operand(i, 3)?;
                let g = self.operand(i, 2)?;
                let b = self.operand(i, 1)?;
                self.color = Rgb::from_rgb(r, g, b);
            }
            (State::Graphics, Operator::Save) => {
                self.transforms.push(self.transform);
                self.colors.push(self.color);
            }
            (State::Graphics, Operator::Restore) => {
                match (self.transforms.pop(), self.colors.pop()) {
                    (Some(t), Some(c)) => {
                        self.transform = t;
                        self.color = c;
                    }
                    _ => return Err(StreamError::UnbalancedRestore { position: i }),
                }
            }
            (State::Graphics, Operator::Rectangle) => {
                if self.lookahead(i, 1) == Some(Operator::Fill) {
                    self.fill_rectangle(i)?;
                }
            }
            (State::Graphics, Operator::MoveTo) => {
                if self.lookahead(i, 3) == Some(Operator::LineTo) {
                    self.line_segment(i)?;
                }
            }
            (State::Graphics, _) => {}
        }

        Ok(())
    }

    /// `x y w h re f`
    fn fill_rectangle(&mut self, i: usize) -> Result<(), StreamError> {
        let x = self.operand(i, 4)?;
        let y = self.operand(i, 3)?;
        let w = self.operand(i, 2)?;
        let h = self.operand(i, 1)?;

        let (x0, y0) = self.to_page(self.transform.apply(x, y));
        let (x1, y1) = self.to_page(self.transform.apply(x + w, y + h));
        let bbox = BBox::from_corners((x0, y0), (x1, y1));
        self.rects.push(Rect::new(bbox, self.color));
        Ok(())
    }

    /// `xs ys m xe ye l`, horizontal segments only.
    fn line_segment(&mut self, i: usize) -> Result<(), StreamError> {
        let xs = self.operand(i, 2)?;
        let ys = self.operand(i, 1)?;
        let xe = self.number_at(i + 1, "l")?;
        let ye = self.number_at(i + 2, "l")?;
        if ys != ye {
            return Ok(());
        }

        let (x0, y) = self.to_page(self.transform.apply(xs, ys));
        let (x1, _) = self.to_page(self.transform.apply(xe, ye));
        let half = self.line_thickness / 2.0;
        let bbox = BBox::from_corners((x0, y - half), (x1, y + half));
        self.rects.push(Rect::new(bbox, self.color));
        Ok(())
    }

    /// User space to top-left page space.
    fn to_page(&self, (x, y): (f32, f32)) -> (f32, f32) {
        (x - self.origin.0, self.origin.1 + self.page_height - y)
    }

    /// Numeric operand `back` tokens before the operator at `i`.
    fn operand(&self, i: usize, back: usize) -> Result<f32, StreamError> {
        let operator = self.tokens[i].text;
        if back > i {
            return Err(StreamError::OperandUnderflow {
                operator: operator.to_string(),
                position: i,
            });
        }
        self.number_at(i - back, operator)
    }

    fn number_at(&self, index: usize, operator: &str) -> Result<f32, StreamError> {
        let token = self
            .tokens
            .get(index)
            .ok_or_else(|| StreamError::OperandUnderflow {
                operator: operator.to_string(),
                position: index,
            })?;
        token.number().ok_or_else(|| StreamError::NonNumericOperand {
            operator: operator.to_string(),
            token: token.text.to_string(),
            position: index,
        })
    }

    fn lookahead(&self, i: usize, ahead: usize) -> Option<Operator> {
        self.tokens.get(i + ahead).and_then(Token::operator)
    }
}

/// Recover shapes from a content stream.
pub fn rects_from_stream(stream: &str, page_height: f32, line_thickness: f32) -> StreamShapes {
    StreamInterpreter::new(stream, page_height, line_thickness).run()
}
