//! C source fixtures

/// `int main() { return 0; }`
pub const MINIMAL_PROGRAM: &str = "int main() { return 0; }";

/// gets() on line 7, after a header and some setup
pub const GETS_ON_LINE_7: &str = "#include <stdio.h>\n\
\n\
/* read a name */\n\
int main() {\n\
    char buffer[10];\n\
    printf(\"name: \");\n\
    gets(buffer);\n\
    return 0;\n\
}\n";

/// Tainted arithmetic with no bounds check
pub const TAINTED_ADDITION: &str = "int main(int argc, char **argv) {\n\
    int x = atoi(argv[1]);\n\
    int y = x + 10;\n\
    return y;\n\
}\n";

/// Same arithmetic guarded by a comparison
pub const GUARDED_ADDITION: &str = "int main(int argc, char **argv) {\n\
    int x = atoi(argv[1]);\n\
    if (x < 100) { int y = x + 10; }\n\
    return 0;\n\
}\n";

/// Several problems at once: unsafe calls, a format string and a missing `}`
pub const KITCHEN_SINK: &str = "#include <string.h>\n\
void copy(char *dst, char *src) {\n\
    strcpy(dst, src);\n\
}\n\
\n\
int main(int argc, char **argv) {\n\
    char out[64];\n\
    sprintf(out, \"%s\", argv[1]);\n\
    printf(out);\n\
    system(argv[2]);\n\
    return 0;\n";

/// A function with `n` sequential statements
pub fn fixture_n_statements(n: usize) -> String {
    let body: String = (0..n)
        .map(|i| format!("    int v{i} = {i} + 1;\n"))
        .collect();
    format!("int main() {{\n{body}    return 0;\n}}\n")
}

/// A file with `n` small functions
pub fn fixture_n_functions(n: usize) -> String {
    (0..n)
        .map(|i| format!("int func_{i}(int a) {{ return a * {i}; }}\n"))
        .collect()
}

/// A function whose body nests `depth` blocks
pub fn fixture_nested_blocks(depth: usize) -> String {
    format!("int main() {{{}{}}}", "{".repeat(depth), "}".repeat(depth))
}

/// `call(arg);` inside a minimal function
pub fn fixture_call(function: &str) -> String {
    format!("void f() {{\n    {function}(arg);\n}}\n")
}
