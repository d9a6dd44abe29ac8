//! Lexical analyzer for expression source text.
//!
//! The scanner converts source text into a stream of [`Token`]s for
//! validation and tree building. The public entry point is [`scan`], which
//! never fails: characters it cannot classify are kept in the stream as
//! [`Token::Unknown`] and reported as diagnostics alongside the tokens, so
//! malformed input still yields a complete token sequence for the
//! validation pipeline to reject.
//!
//! Whitespace is consumed between tokens and never becomes a token.

use winnow::{
    Parser as _,
    ascii::float,
    combinator::{alt, peek},
    error::{ContextError, ModalResult},
    stream::{LocatingSlice, Location, Stream},
    token::{one_of, take_while},
};

use crate::{
    error::{Diagnostic, ErrorCode},
    span::Span,
    tokens::{PositionedToken, Token},
};

type Input<'a> = LocatingSlice<&'a str>;
type IResult<O> = ModalResult<O, ContextError>;

/// Parse a numeric literal.
///
/// Guarded on a leading digit or `.` so identifiers are never mistaken for
/// the textual float forms (`inf`, `nan`) the underlying parser accepts.
fn number<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    peek(one_of(|c: char| c.is_ascii_digit() || c == '.')).parse_next(input)?;
    float.map(Token::Number).parse_next(input)
}

/// Parse an identifier: a letter or underscore followed by alphanumerics
/// or underscores.
fn identifier<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '_')
        .verify(|s: &str| {
            s.chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        })
        .map(Token::Identifier)
        .parse_next(input)
}

/// Parse single character operator and punctuation tokens.
fn single_char_token<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    alt((
        '+'.value(Token::Plus),
        '-'.value(Token::Minus),
        '*'.value(Token::Star),
        '/'.value(Token::Slash),
        '^'.value(Token::Caret),
        '('.value(Token::LeftParen),
        ')'.value(Token::RightParen),
        ','.value(Token::Comma),
    ))
    .parse_next(input)
}

/// Parse a single token with position tracking.
fn positioned_token<'a>(input: &mut Input<'a>) -> IResult<PositionedToken<'a>> {
    let start_pos = input.current_token_start();

    let token = alt((
        number,     // Must come before identifier and single chars
        identifier, // Must come before single chars
        single_char_token,
    ))
    .parse_next(input)?;

    let end_pos = input.current_token_start();
    let span = Span::new(start_pos..end_pos);

    Ok(PositionedToken::new(token, span))
}

/// Scanner that accumulates tokens and diagnostics during tokenization.
struct Scanner<'a> {
    tokens: Vec<PositionedToken<'a>>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Scanner<'a> {
    fn new() -> Self {
        Self {
            tokens: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Tokenize the input, collecting tokens and diagnostics.
    fn tokenize(&mut self, mut input: Input<'a>) {
        loop {
            // Whitespace separates tokens but is not part of the stream
            let _: IResult<&str> = take_while(0.., char::is_whitespace).parse_next(&mut input);
            if input.is_empty() {
                break;
            }

            match positioned_token(&mut input) {
                Ok(token) => self.tokens.push(token),
                Err(_) => self.recover_unknown(&mut input),
            }
        }
    }

    /// Consume one unclassifiable character as an `Unknown` token and
    /// report it, keeping the stream complete for the validators.
    fn recover_unknown(&mut self, input: &mut Input<'a>) {
        let start = input.current_token_start();
        let Some(c) = input.next_token() else {
            return;
        };
        let span = Span::new(start..input.current_token_start());

        self.diagnostics.push(
            Diagnostic::error(format!("unexpected character `{c}`"))
                .with_code(ErrorCode::E001)
                .with_label(span, ErrorCode::E001.description())
                .with_help("expressions may contain numbers, names, `+ - * / ^`, parentheses and `,`"),
        );
        self.tokens.push(PositionedToken::new(Token::Unknown(c), span));
    }
}

/// Scan source text into positioned tokens.
///
/// Always produces a token sequence; lexical problems are returned as
/// diagnostics next to it rather than aborting the scan. The caller merges
/// them with validation diagnostics so the user sees every problem at once.
pub fn scan(input: &str) -> (Vec<PositionedToken<'_>>, Vec<Diagnostic>) {
    let located_input = LocatingSlice::new(input);
    let mut scanner = Scanner::new();
    scanner.tokenize(located_input);
    (scanner.tokens, scanner.diagnostics)
}
