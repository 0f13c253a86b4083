use crate::translator::r#type::Type;

/// Emitted before the translated program.
pub const PREAMBLE: &str = "\
#include <stdio.h>
#include <stdlib.h>
#include <string.h>

char* concat(char* str1, char* str2);
char* itos(int x);
char* ctos(char c);
char* read_file(char* path);
void write_file(char* path, char* content);

";

/// Emitted after the translated program. Every string helper returns a
/// fresh heap buffer so that several results can live in one expression.
pub const HELPERS: &str = r#"
char* concat(char* str1, char* str2) {
    size_t len = strlen(str1) + strlen(str2) + 1;
    char* buf = malloc(len);
    snprintf(buf, len, "%s%s", str1, str2);
    return buf;
}

char* itos(int x) {
    char* buf = malloc(32);
    snprintf(buf, 32, "%d", x);
    return buf;
}

char* ctos(char c) {
    char* buf = malloc(2);
    buf[0] = c;
    buf[1] = '\0';
    return buf;
}

char* read_file(char* path) {
    FILE* f = fopen(path, "rb");
    if (!f) return NULL;
    fseek(f, 0, SEEK_END);
    long len = ftell(f);
    fseek(f, 0, SEEK_SET);
    char* buf = malloc(len + 1);
    size_t n = fread(buf, 1, len, f);
    buf[n] = '\0';
    fclose(f);
    return buf;
}

void write_file(char* path, char* content) {
    FILE* f = fopen(path, "w");
    if (!f) return;
    fprintf(f, "%s", content);
    fclose(f);
}
"#;

/// Functions callable from every program without a prototype.
pub const BUILTINS: &[(&str, Type)] = &[
    ("concat", Type::Str),
    ("itos", Type::Str),
    ("ctos", Type::Str),
    ("read_file", Type::Str),
    ("write_file", Type::Void),
    ("strlen", Type::Int),
    ("strcmp", Type::Int),
];

pub fn is_builtin(name: &str) -> bool {
    BUILTINS.iter().any(|(builtin, _)| *builtin == name)
}
