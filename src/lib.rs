use parser::{ast::ASTRefVisitor, pretty_print_ast::PrettyPrint, Parser};
use translator::Translator;

pub mod lexer;
pub mod parser;
pub mod runtime;
pub mod translator;

/// Translates dav source to the C text of its globals and functions.
pub fn translate(input: &str, debug: bool) -> anyhow::Result<String> {
    let tokens = lexer::Lexer::new(input).tokenize()?;
    if debug {
        println!("Tokens: {tokens:#?}");
    }

    let mut parser = Parser::new(input, tokens);
    let program = parser.program()?;
    if debug {
        println!("AST:\n{}", PrettyPrint::new().visit_program(&program));
    }

    let c_code = Translator::new().translate(&program)?;
    if debug {
        println!("C:\n{c_code}");
    }
    Ok(c_code)
}

/// Like [`translate`], wrapped in the runtime preamble and helper definitions.
pub fn compile(input: &str, debug: bool) -> anyhow::Result<String> {
    let program = translate(input, debug)?;
    Ok(format!("{}{}{}", runtime::PREAMBLE, program, runtime::HELPERS))
}
