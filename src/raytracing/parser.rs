use std::fmt;

use log::debug;

use super::{
    camera::Screen,
    color::Color,
    core::{ColoredTriangle, Face, Scene, SurfaceKind},
    model::Model,
    Mat4, Transformable, Triangle, Vec3,
};

pub struct SceneParser {
    content: Vec<char>,
    buffer: String,
    position: FilePosition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilePosition {
    pub line: u32,
    pub column: u32,
    index: u32,
}

impl FilePosition {
    fn new() -> Self {
        FilePosition {
            line: 0,
            column: 0,
            index: 0,
        }
    }

    fn on_new_line(self: &mut Self) {
        self.line += 1;
        self.column = 0;
        self.index += 1;
    }

    fn advance(self: &mut Self) {
        self.column += 1;
        self.index += 1;
    }
}

#[derive(Debug)]
pub struct ParserError {
    pub position: FilePosition,
    pub message: String,
}

impl ParserError {
    fn new(message: &str, position: FilePosition) -> ParserError {
        ParserError {
            position,
            message: message.to_string(),
        }
    }

    /// Prints the error followed by the offending line and a caret under the column.
    pub fn print_error_location(self: &Self, content: &str) {
        eprintln!("{}", self);
        if let Some(line) = content.lines().nth(self.position.line as usize) {
            eprintln!("{}", line);
            let spacing = " ".repeat(self.position.column as usize);
            eprintln!("{}^", spacing);
        }
    }
}

impl fmt::Display for ParserError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} at {}:{}",
            self.message, self.position.line, self.position.column
        )
    }
}

impl std::error::Error for ParserError {}

type ParserResult<T> = Result<T, ParserError>;

/// Everything a scene file describes.
#[derive(Debug)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub screen: Screen,
    pub bounces: u32,
    pub background: Color,
    /// Triangles that never move.
    pub fixed: Scene,
    /// Groups posed by the two angles given at render time.
    pub faces: Vec<Face>,
}

impl ImageData {
    /// The fixed triangles followed by every face posed by `theta` and `phi`.
    pub fn scene(&self, theta: f64, phi: f64) -> Scene {
        let mut scene = self.fixed.clone();
        for face in &self.faces {
            scene.extend(face.posed(theta, phi));
        }
        scene
    }
}

impl SceneParser {
    pub fn new(content: &str) -> SceneParser {
        SceneParser {
            content: content.chars().collect(),
            position: FilePosition::new(),
            buffer: "".to_string(),
        }
    }

    fn get_current_char(self: &Self) -> Option<char> {
        self.content.get(self.position.index as usize).copied()
    }

    fn is_empty(self: &mut Self) -> bool {
        self.peek().is_empty()
    }

    fn advance(self: &mut Self) -> bool {
        if let Some(current_char) = self.get_current_char() {
            if current_char == '\n' {
                self.position.on_new_line();
            } else {
                self.position.advance();
            }
            return true;
        }
        return false;
    }

    fn advance_until(self: &mut Self, f: impl Fn(char) -> bool) {
        while let Some(current_char) = self.get_current_char() {
            if f(current_char) {
                break;
            }
            self.advance();
        }
    }

    fn eat_spaces(self: &mut Self) {
        // consume all the empty lines, spaces and comments before the next token
        while let Some(current_char) = self.get_current_char() {
            if current_char == '#' {
                // the end of line is consumed at the end of the loop
                self.advance_until(|c| c == '\n');
            } else if !current_char.is_whitespace() {
                break;
            }
            self.advance();
        }
    }

    // push the current char to the token and return the next one, a space at the end of file
    fn enqueue(self: &mut Self, token: &mut String) -> char {
        if let Some(current_char) = self.get_current_char() {
            token.push(current_char);
            self.advance();
        }
        self.get_current_char().unwrap_or(' ')
    }

    fn pop(self: &mut Self) -> String {
        // check if we already peeked without eating the next token
        if !self.buffer.is_empty() {
            return std::mem::take(&mut self.buffer);
        }

        self.eat_spaces();
        let mut result = String::new();
        let Some(mut current_char) = self.get_current_char() else {
            return result;
        };

        match current_char {
            ',' | '(' | ')' | ':' | '>' | '{' | '}' => {
                self.advance();
                result.push(current_char);
            }
            '"' => {
                self.enqueue(&mut result);
                while let Some(next_char) = self.get_current_char() {
                    self.enqueue(&mut result);
                    if next_char == '"' {
                        break;
                    }
                }
            }
            '.' | '+' | '-' | '0'..='9' => {
                if current_char == '+' || current_char == '-' {
                    current_char = self.enqueue(&mut result);
                }
                while current_char.is_ascii_digit() {
                    current_char = self.enqueue(&mut result);
                }
                if current_char == '.' {
                    current_char = self.enqueue(&mut result);
                    while current_char.is_ascii_digit() {
                        current_char = self.enqueue(&mut result);
                    }
                }
            }
            _ => {
                if current_char.is_alphabetic() {
                    while current_char.is_alphanumeric() || current_char == '_' {
                        current_char = self.enqueue(&mut result);
                    }
                } else {
                    // unknown symbol, returned alone so the caller reports it
                    self.enqueue(&mut result);
                }
            }
        }
        return result;
    }

    fn peek(self: &mut Self) -> &String {
        // peek always look ahead and save the result to the buffer
        if self.buffer.is_empty() {
            self.buffer = self.pop();
        }
        return &self.buffer;
    }

    fn error<T>(self: &Self, message: &str) -> ParserResult<T> {
        Err(ParserError::new(message, self.position))
    }

    fn parse_float(self: &mut Self) -> ParserResult<f64> {
        let next_token = self.pop();
        match next_token.parse::<f64>() {
            Ok(num) => Ok(num),
            Err(_) => self.error(&format!("cannot interpret '{}' as a number", next_token)),
        }
    }

    fn parse_unsigned(self: &mut Self) -> ParserResult<u32> {
        let next_token = self.pop();
        match next_token.parse::<u32>() {
            Ok(num) => Ok(num),
            Err(_) => self.error(&format!(
                "cannot interpret '{}' as a positive integer",
                next_token
            )),
        }
    }

    fn match_token(self: &mut Self, expected_lexem: &str) -> ParserResult<()> {
        // consume a lexem and fail if it is not the expected one
        let next_lexem = self.pop();
        if next_lexem != expected_lexem {
            self.error(&format!(
                "expected '{}', getting '{}' instead",
                expected_lexem, next_lexem
            ))
        } else {
            Ok(())
        }
    }

    fn maybe_match(self: &mut Self, expected_lexem: &str) -> bool {
        // consume the next lexem only when it is the expected one
        if self.peek() == expected_lexem {
            self.pop();
            return true;
        }
        return false;
    }

    fn parse_header(self: &mut Self) -> ParserResult<(u32, u32)> {
        self.match_token("size")?;
        let width = self.parse_unsigned()?;
        let height = self.parse_unsigned()?;
        if width == 0 || height == 0 {
            return self.error("the image size must be positive");
        }
        Ok((width, height))
    }

    fn parse_vec3(self: &mut Self) -> ParserResult<Vec3> {
        self.match_token("(")?;
        let x = self.parse_float()?;
        self.match_token(",")?;
        let y = self.parse_float()?;
        self.match_token(",")?;
        let z = self.parse_float()?;
        self.match_token(")")?;
        return Ok(Vec3::new(x, y, z));
    }

    fn parse_color(self: &mut Self) -> ParserResult<Color> {
        let named = match self.peek().as_str() {
            "red" => Some(Color::RED),
            "green" => Some(Color::GREEN),
            "blue" => Some(Color::BLUE),
            "white" => Some(Color::WHITE),
            "black" => Some(Color::BLACK),
            "cyan" => Some(Color::new(0.0, 1.0, 1.0)),
            "violet" => Some(Color::new(1.0, 0.0, 1.0)),
            "yellow" => Some(Color::new(1.0, 1.0, 0.0)),
            "orange" => Some(Color::new(0.98, 0.45, 0.02)),
            "skin" => Some(Color::new(0.94, 0.84, 0.7)),
            _ => None,
        };
        if let Some(color) = named {
            self.pop();
            return Ok(color);
        }
        let Vec3 { x, y, z } = self.parse_vec3()?;
        Ok(Color::new(x, y, z))
    }

    fn parse_surface(self: &mut Self) -> ParserResult<(SurfaceKind, Color)> {
        let mut kind = SurfaceKind::Emit;
        if self.maybe_match("absorb") {
            kind = SurfaceKind::Absorb;
            self.match_token(":")?;
        } else if self.maybe_match("emit") {
            self.match_token(":")?;
        }
        let color = self.parse_color()?;
        Ok((kind, color))
    }

    fn parse_pivot(self: &mut Self) -> ParserResult<Vec3> {
        if self.peek() == "(" {
            self.parse_vec3()
        } else {
            Ok(Vec3::zero())
        }
    }

    fn parse_trasformation(self: &mut Self) -> ParserResult<Mat4> {
        let mut trasform = Mat4::identity();
        while self.maybe_match(">") {
            let next_trasform = match self.pop().as_str() {
                "scale" => Mat4::scale(self.parse_float()?),
                "translate" => Mat4::translate(self.parse_vec3()?),
                "rotate_x" => {
                    let angle = self.parse_float()?;
                    Mat4::rotate_x(angle).around(self.parse_pivot()?)
                }
                "rotate_y" => {
                    let angle = self.parse_float()?;
                    Mat4::rotate_y(angle).around(self.parse_pivot()?)
                }
                "rotate_z" => {
                    let angle = self.parse_float()?;
                    Mat4::rotate_z(angle).around(self.parse_pivot()?)
                }
                other => {
                    return self.error(&format!("unexpected trasformation '{}'", other));
                }
            };
            trasform = trasform.then(&next_trasform);
        }
        Ok(trasform)
    }

    fn parse_string(self: &mut Self) -> ParserResult<String> {
        let next_token = self.pop();
        match next_token
            .strip_prefix('"')
            .and_then(|token| token.strip_suffix('"'))
        {
            Some(content) => Ok(content.to_string()),
            None => self.error(&format!("expected a quoted string, getting '{}'", next_token)),
        }
    }

    fn parse_screen(self: &mut Self) -> ParserResult<Screen> {
        self.match_token("screen")?;
        let standoff = self.parse_float()?;
        let bottom_left = self.parse_vec3()?;
        let bottom_right = self.parse_vec3()?;
        let top_left = self.parse_vec3()?;
        Ok(Screen {
            standoff,
            bottom_left,
            bottom_right,
            top_left,
        })
    }

    fn parse_triangle(self: &mut Self) -> ParserResult<ColoredTriangle> {
        self.match_token("triangle")?;
        let (kind, color) = self.parse_surface()?;
        let p0 = self.parse_vec3()?;
        let p1 = self.parse_vec3()?;
        let p2 = self.parse_vec3()?;
        let trasform = self.parse_trasformation()?;
        Ok(ColoredTriangle::new(kind, color, Triangle::new(p0, p1, p2)).transform(&trasform))
    }

    fn parse_model(self: &mut Self) -> ParserResult<Vec<ColoredTriangle>> {
        self.match_token("model")?;
        let path = self.parse_string()?;
        let position = self.position;
        let (kind, color) = self.parse_surface()?;
        let trasform = self.parse_trasformation()?;
        let model = Model::load(&path, trasform).map_err(|err| {
            ParserError::new(&format!("cannot load model \"{}\": {}", path, err), position)
        })?;
        Ok(model
            .iter_triangles()
            .map(|shape| ColoredTriangle::new(kind, color, shape))
            .collect())
    }

    // a single statement can produce many triangles
    fn parse_object(self: &mut Self) -> ParserResult<Option<Vec<ColoredTriangle>>> {
        match self.peek().as_str() {
            "triangle" => Ok(Some(vec![self.parse_triangle()?])),
            "model" => Ok(Some(self.parse_model()?)),
            _ => Ok(None),
        }
    }

    fn parse_face(self: &mut Self) -> ParserResult<Face> {
        self.match_token("face")?;
        let center = self.parse_vec3()?;
        self.match_token("{")?;
        let mut triangles = Vec::new();
        while !self.maybe_match("}") {
            match self.parse_object()? {
                Some(objects) => triangles.extend(objects),
                None => {
                    let message = format!("unexpected token '{}' inside face", self.peek());
                    return self.error(&message);
                }
            }
        }
        Ok(Face { center, triangles })
    }

    /// Parses a whole scene file.
    pub fn parse_scene(self: &mut Self) -> ParserResult<ImageData> {
        let (width, height) = self.parse_header()?;

        let mut screen = Screen::default();
        let mut bounces = 1;
        let mut background = Color::GREEN;
        let mut fixed = Vec::new();
        let mut faces = Vec::new();
        while !self.is_empty() {
            match self.peek().as_str() {
                "screen" => screen = self.parse_screen()?,
                "bounces" => {
                    self.pop();
                    bounces = self.parse_unsigned()?;
                }
                "background" => {
                    self.pop();
                    background = self.parse_color()?;
                }
                "face" => faces.push(self.parse_face()?),
                _ => match self.parse_object()? {
                    Some(objects) => fixed.extend(objects),
                    None => {
                        let message = format!("unexpected token '{}'", self.peek());
                        return self.error(&message);
                    }
                },
            }
        }
        debug!(
            "parsed scene: {}x{}, {} fixed triangles, {} faces",
            width,
            height,
            fixed.len(),
            faces.len()
        );
        Ok(ImageData {
            width,
            height,
            screen,
            bounces,
            background,
            fixed,
            faces,
        })
    }
}
