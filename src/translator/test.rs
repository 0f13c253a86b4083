use super::*;
use crate::lexer::Lexer;
use crate::parser::Parser;
use indoc::indoc;
use pretty_assertions::assert_eq;
use r#type::Base;

fn translate(input: &str) -> TranslateResult<String> {
    let tokens = Lexer::new(input).tokenize().unwrap();
    let program = Parser::new(input, tokens).program().unwrap();
    Translator::new().translate(&program)
}

/// Translated statements of a `main` wrapping `body`, one level of indentation stripped.
fn main_body(body: &str) -> TranslateResult<Vec<String>> {
    let c_code = translate(&format!("ah main() {{\n{body}\n}}"))?;
    Ok(c_code
        .lines()
        .filter_map(|line| line.strip_prefix("    "))
        .map(String::from)
        .collect())
}

fn last_line(body: &str) -> TranslateResult<String> {
    Ok(main_body(body)?.pop().unwrap_or_default())
}

fn type_error_kind(body: &str) -> TypeErrorKind {
    match main_body(body) {
        Err(TranslateError::Type(err)) => err.kind,
        other => panic!("expected a type error, got {:?}", other),
    }
}

fn reference_error_kind(body: &str) -> ReferenceErrorKind {
    match main_body(body) {
        Err(TranslateError::Reference(err)) => err.kind,
        other => panic!("expected a reference error, got {:?}", other),
    }
}

#[test]
fn test_print_formats() -> TranslateResult<()> {
    assert_eq!(last_line("boo(1 + 2);")?, r#"printf("%d\n", 1 + 2);"#);
    assert_eq!(last_line("boo('a');")?, r#"printf("%c\n", 'a');"#);
    assert_eq!(last_line(r#"boo("hi");"#)?, r#"printf("%s\n", "hi");"#);
    assert_eq!(
        last_line(r#"boo("hi" + 3);"#)?,
        r#"printf("%s\n", concat("hi", itos(3)));"#
    );
    assert_eq!(
        last_line(r#"boo('a' + "b" + 1 * 2);"#)?,
        r#"printf("%s\n", concat(concat(ctos('a'), "b"), itos(1 * 2)));"#
    );
    assert_eq!(
        last_line(r#"boo("tab\there");"#)?,
        r#"printf("%s\n", "tab\there");"#
    );

    Ok(())
}

#[test]
fn test_string_comparison() -> TranslateResult<()> {
    assert_eq!(
        last_line(r#"beg s = "a"; boo(s == "b");"#)?,
        r#"printf("%d\n", strcmp(s, "b") == 0);"#
    );
    assert_eq!(
        last_line(r#"beg s = "a"; boo(s != "b" && 1);"#)?,
        r#"printf("%d\n", strcmp(s, "b") != 0 && 1);"#
    );
    assert!(matches!(
        type_error_kind(r#"boo("a" < "b");"#),
        TypeErrorKind::InvalidOperands {
            op: BinaryOp::Lesser,
            ..
        }
    ));
    assert!(matches!(
        type_error_kind(r#"boo("a" == 1);"#),
        TypeErrorKind::InvalidOperands { .. }
    ));
    assert!(matches!(
        type_error_kind(r#"boo("a" - 1);"#),
        TypeErrorKind::InvalidOperands { .. }
    ));

    Ok(())
}

#[test]
fn test_minimal_parentheses() -> TranslateResult<()> {
    let cases = [
        ("(1 + 2) * 3", "(1 + 2) * 3"),
        ("1 + (2 * 3)", "1 + 2 * 3"),
        ("(1 - 2) - 3", "1 - 2 - 3"),
        ("1 - (2 - 3)", "1 - (2 - 3)"),
        ("1 / (2 * 3)", "1 / (2 * 3)"),
        ("1 < 2 == 0", "1 < 2 == 0"),
        ("1 == 2 < 3", "(1 == 2) < 3"),
        ("1 || 0 && 0", "(1 || 0) && 0"),
        ("1 && 0 || 1", "1 && 0 || 1"),
        ("-(1 + 2)", "-(1 + 2)"),
        ("- -1", "-(-1)"),
        ("-2 * 3", "-2 * 3"),
        ("((7))", "7"),
    ];

    for (source, expected) in cases {
        assert_eq!(
            last_line(&format!("boo({source});"))?,
            format!("printf(\"%d\\n\", {expected});")
        );
    }

    Ok(())
}

#[test]
fn test_long_operator_chains() -> TranslateResult<()> {
    let terms = vec!["1"; 5_000].join(" + ");
    assert_eq!(
        last_line(&format!("boo({terms});"))?,
        format!("printf(\"%d\\n\", {terms});")
    );

    assert_eq!(
        last_line("boo(\"s\" + 1 + 'c');")?,
        r#"printf("%s\n", concat(concat("s", itos(1)), ctos('c')));"#
    );
    assert!(matches!(
        type_error_kind("boo(1 + 2 * 3 + \"s\" - 4);"),
        TypeErrorKind::InvalidOperands {
            op: BinaryOp::Minus,
            lhs: Type::Str,
            rhs: Type::Int,
        }
    ));

    Ok(())
}

#[test]
fn test_let_redeclaration() -> TranslateResult<()> {
    assert_eq!(
        main_body("beg x = 5;\nbeg x = 10;")?,
        vec!["int x = 5;", "x = 10;"]
    );
    assert_eq!(
        main_body("beg char c = 'a';\nbeg char c = 'b';")?,
        vec!["char c = 'a';", "c = 'b';"]
    );

    assert!(matches!(
        type_error_kind("beg char x = 'a';\nbeg x = \"a\";"),
        TypeErrorKind::RedeclaredWithDifferentType {
            prev: Type::Char,
            new: Type::Str,
            ..
        }
    ));
    assert!(matches!(
        type_error_kind("beg x = 1;\nbeg char x = 'a';"),
        TypeErrorKind::RedeclaredWithDifferentType {
            prev: Type::Int,
            new: Type::Char,
            ..
        }
    ));
    assert!(matches!(
        type_error_kind("beg char x = 5;"),
        TypeErrorKind::Incompatible {
            expected: Type::Char,
            got: Type::Int,
        }
    ));
    assert!(matches!(
        type_error_kind("beg x = 1;\nbeg int x[2];"),
        TypeErrorKind::AlreadyDeclared(_)
    ));

    Ok(())
}

#[test]
fn test_declarations_without_initializer() -> TranslateResult<()> {
    assert_eq!(
        main_body("beg int n;\nbeg char* s;\nbeg int* p;\nn = 2;")?,
        vec!["int n;", "char* s;", "int* p;", "n = 2;"]
    );
    assert!(matches!(
        type_error_kind("beg void v;"),
        TypeErrorKind::VoidVariable(_)
    ));

    Ok(())
}

#[test]
fn test_arrays() -> TranslateResult<()> {
    assert_eq!(
        main_body("beg int xs[3];\nxs[0] = 2;\nbeg y = xs[0] + 1;")?,
        vec!["int xs[3];", "xs[0] = 2;", "int y = xs[0] + 1;"]
    );
    assert_eq!(
        main_body("beg s = \"ab\";\nbeg c = s[1];\ns[0] = c;")?,
        vec!["char* s = \"ab\";", "char c = s[1];", "s[0] = c;"]
    );
    assert_eq!(
        last_line("beg int xs[3];\nbeg p = xs + 1;")?,
        "int* p = xs + 1;"
    );

    let kind = type_error_kind("beg int y = 1;\ny[0] = 2;");
    assert!(kind.to_string().contains("not an array"));
    assert!(matches!(
        type_error_kind("beg y = 1;\nboo(y[0]);"),
        TypeErrorKind::NotAnArray { ty: Type::Int, .. }
    ));
    assert!(matches!(
        type_error_kind("beg char cs[2];\ncs[0] = 1;"),
        TypeErrorKind::ArrayElementMismatch {
            element: Type::Char,
            got: Type::Int,
        }
    ));
    assert!(matches!(
        type_error_kind("beg int xs[2];\nxs['a'] = 1;"),
        TypeErrorKind::NonIntegerIndex(Type::Char)
    ));
    assert!(matches!(
        type_error_kind("beg char* ss[2];"),
        TypeErrorKind::InvalidArrayBase(Type::Str)
    ));
    assert!(matches!(
        type_error_kind("beg int xs[2];\nbeg p = 1 - xs;"),
        TypeErrorKind::InvalidOperands {
            lhs: Type::Int,
            rhs: Type::Pointer(Base::Int),
            ..
        }
    ));
    assert!(matches!(
        type_error_kind("beg int xs[2];\nboo(xs);"),
        TypeErrorKind::Unprintable(Type::Pointer(Base::Int))
    ));

    Ok(())
}

#[test]
fn test_operand_types() {
    assert!(matches!(
        type_error_kind("boo(-'a');"),
        TypeErrorKind::InvalidNegation(Type::Char)
    ));
    assert!(matches!(
        type_error_kind("boo(\"a\" * 2);"),
        TypeErrorKind::InvalidOperands {
            op: BinaryOp::Mul,
            ..
        }
    ));
    assert!(matches!(
        type_error_kind("boo(1.5);"),
        TypeErrorKind::FloatLiteral(_)
    ));
}

#[test]
fn test_reference_errors() {
    assert!(matches!(
        reference_error_kind("foo(1);"),
        ReferenceErrorKind::UndeclaredFunction(ref name) if name == "foo"
    ));
    assert!(matches!(
        reference_error_kind("beg x = 1 + bar();"),
        ReferenceErrorKind::UndeclaredFunction(ref name) if name == "bar"
    ));
    assert!(matches!(
        reference_error_kind("beg x = y;"),
        ReferenceErrorKind::UndeclaredVariable(ref name) if name == "y"
    ));
    assert!(matches!(
        reference_error_kind("z = 1;"),
        ReferenceErrorKind::UndeclaredVariable(_)
    ));

    let err = translate("ah main() {\n    return later();\n}\nah later() {\n    return 1;\n}")
        .unwrap_err();
    assert_eq!(err.token().line, 2);
    assert_eq!(
        err.to_string(),
        "ReferenceError on line 2: function `later` is not declared"
    );
}

#[test]
fn test_function_scopes() -> TranslateResult<()> {
    // Declarations inside blocks stay visible for the rest of the function.
    assert_eq!(
        main_body("if (1) {\nbeg y = 2;\n}\nboo(y);")?.last().cloned(),
        Some(String::from(r#"printf("%d\n", y);"#))
    );

    let err = translate("ah f() { beg x = 1; return x; }\nah main() { return x; }").unwrap_err();
    assert!(matches!(
        err,
        TranslateError::Reference(ReferenceError {
            kind: ReferenceErrorKind::UndeclaredVariable(_),
            ..
        })
    ));

    Ok(())
}

#[test]
fn test_functions() -> TranslateResult<()> {
    let input = indoc! {r#"
        // helpers
        ah add(int a, int b) {
            return a + b;
        }
        ah fact(n) {
            if (n < 2) {
                return 1;
            }
            return n * fact(n - 1);
        }
        ah void greet(char* name, char letters[]) {
            boo("hi " + name);
        }
        ah main() {
            greet("dav", "x");
            boo(add(1, 2) * fact(3));
            return 0;
        }
    "#};
    let expected = indoc! {r#"
        // helpers
        int add(int a, int b) {
            return a + b;
        }

        int fact(int n) {
            if (n < 2) {
                return 1;
            }
            return n * fact(n - 1);
        }

        void greet(char* name, char letters[]) {
            printf("%s\n", concat("hi ", name));
        }

        int main() {
            greet("dav", "x");
            printf("%d\n", add(1, 2) * fact(3));
            return 0;
        }

    "#};
    assert_eq!(translate(input)?, expected);

    Ok(())
}

#[test]
fn test_prototypes_and_duplicates() -> TranslateResult<()> {
    let input = indoc! {r#"
        ah char* name();
        ah main() {
            boo(name());
            return 0;
        }
        ah char* name() {
            return "dav";
        }
    "#};
    assert!(translate(input)?.starts_with("char* name();\nint main() {\n"));

    let err = translate("ah f() { return 1; }\nah f() { return 2; }").unwrap_err();
    assert!(matches!(
        err,
        TranslateError::Type(TypeError {
            kind: TypeErrorKind::DuplicateDefinition(_),
            ..
        })
    ));

    let err = translate("ah f();\nah char f() { return 'a'; }").unwrap_err();
    assert!(matches!(
        err,
        TranslateError::Type(TypeError {
            kind: TypeErrorKind::FunctionRedeclared {
                prev: Type::Int,
                new: Type::Char,
                ..
            },
            ..
        })
    ));

    let err = translate("ah f(a, a) { return a; }").unwrap_err();
    assert!(matches!(
        &err,
        TranslateError::Type(TypeError {
            kind: TypeErrorKind::AlreadyDeclared(name),
            token,
        }) if name == "a" && token.column == 8
    ));
    let err = translate("ah g(int a, char b, char* a);").unwrap_err();
    assert!(matches!(
        err,
        TranslateError::Type(TypeError {
            kind: TypeErrorKind::AlreadyDeclared(_),
            ..
        })
    ));

    let err = translate("ah char* itos(int x) { return \"0\"; }").unwrap_err();
    assert!(matches!(
        err,
        TranslateError::Type(TypeError {
            kind: TypeErrorKind::DuplicateDefinition(_),
            ..
        })
    ));

    Ok(())
}

#[test]
fn test_return_types() {
    let err = translate("ah main() {\n    return \"s\";\n}").unwrap_err();
    assert_eq!(
        err.to_string(),
        "TypeError on line 2: return type mismatch: function returns `int`, got `char*`"
    );

    let err = translate("ah char f() {\n    return 1;\n}").unwrap_err();
    assert!(matches!(
        err,
        TranslateError::Type(TypeError {
            kind: TypeErrorKind::ReturnMismatch {
                expected: Type::Char,
                got: Type::Int,
            },
            ..
        })
    ));
}

#[test]
fn test_void_functions() -> TranslateResult<()> {
    assert_eq!(
        main_body("write_file(\"out.txt\", \"data\");")?,
        vec![r#"write_file("out.txt", "data");"#]
    );
    assert!(matches!(
        type_error_kind("beg x = write_file(\"a\", \"b\");"),
        TypeErrorKind::VoidValue
    ));
    assert!(matches!(
        type_error_kind("boo(strlen(\"ab\") + 1);\nboo(write_file(\"a\", \"b\"));"),
        TypeErrorKind::VoidValue
    ));

    let err = translate("ah f(void v) { return 1; }").unwrap_err();
    assert!(matches!(
        err,
        TranslateError::Type(TypeError {
            kind: TypeErrorKind::VoidVariable(_),
            ..
        })
    ));

    Ok(())
}

#[test]
fn test_if_else_layout() -> TranslateResult<()> {
    let body = indoc! {r#"
        if (1 < 2) {
            boo(1);
        } else if (0) {
            boo(2);
        }
        // otherwise
        else {
        }
        while (0) {
            // spin
        }
    "#};
    assert_eq!(
        main_body(body)?,
        vec![
            "if (1 < 2) {",
            r#"    printf("%d\n", 1);"#,
            "} else if (0) {",
            r#"    printf("%d\n", 2);"#,
            "}",
            "// otherwise",
            "else {",
            "}",
            "while (0) {",
            "    // spin",
            "}",
        ]
    );

    Ok(())
}

#[test]
fn test_globals() -> TranslateResult<()> {
    let input = indoc! {r#"
        beg int counter = 0;
        beg char buffer[16];
        ah main() {
            counter = counter + 1;
            buffer[0] = 'a';
            return counter;
        }
    "#};
    let expected = indoc! {r#"
        int counter = 0;
        char buffer[16];
        int main() {
            counter = counter + 1;
            buffer[0] = 'a';
            return counter;
        }

    "#};
    assert_eq!(translate(input)?, expected);

    let err = translate("beg g = 1;\nbeg g = 2;").unwrap_err();
    assert!(matches!(
        err,
        TranslateError::Type(TypeError {
            kind: TypeErrorKind::AlreadyDeclared(_),
            ..
        })
    ));

    let input = indoc! {r#"
        beg int n = -(2 * 3) + 'a';
        beg char* s = "dav";
    "#};
    assert_eq!(
        translate(input)?,
        "int n = -(2 * 3) + 'a';\nchar* s = \"dav\";\n"
    );

    let non_constant = [
        "ah one() { return 1; }\nbeg g = one();",
        "beg s = \"a\" + 1;",
        "beg h = 1;\nbeg k = h + 1;",
        "beg char* t = \"a\";\nbeg u = t == \"b\";",
    ];
    for input in non_constant {
        let err = translate(input).unwrap_err();
        assert!(
            matches!(
                err,
                TranslateError::Type(TypeError {
                    kind: TypeErrorKind::NonConstantGlobal(_),
                    ..
                })
            ),
            "{input}: {err:?}"
        );
    }

    Ok(())
}

#[test]
fn test_reserved_names() {
    assert!(matches!(
        type_error_kind("beg itos = 1;\nboo(\"a\" + 2);"),
        TypeErrorKind::ReservedName(name) if name == "itos"
    ));
    assert!(matches!(
        type_error_kind("beg char concat[4];"),
        TypeErrorKind::ReservedName(_)
    ));

    for input in [
        "ah f(int strlen) { return strlen; }",
        "beg read_file = 0;",
    ] {
        let err = translate(input).unwrap_err();
        assert!(matches!(
            err,
            TranslateError::Type(TypeError {
                kind: TypeErrorKind::ReservedName(_),
                ..
            })
        ));
    }
}
