//! Pipeline orchestration and the external backend contract.
//!
//! The three front-end stages run as a producer chain (each on its own
//! thread behind a small bounded channel); the analyzer joins them once its
//! forward-declaration pass has drained the parser. Compile errors come back
//! as data; I/O, lowering and backend failures use the fatal error channel.

use crate::target::Target;
use anyhow::{anyhow, Context, Result};
use maqui_ir::Module;
use maqui_parse::{Lexer, Parser};
use maqui_types::{Analyzer, Ast, CompileError, SymbolTable};
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;

pub struct Compiler {
    target: Target,
}

impl Compiler {
    pub fn new(target: Target) -> Self {
        Compiler { target }
    }

    /// Compiles one source file to an executable. A non-empty return value
    /// lists the compile errors; the backend is only invoked when there are
    /// none.
    pub fn compile(&self, path: &Path) -> Result<Vec<CompileError>> {
        let ast = self.analyze_file(path)?;
        if !ast.errors.is_empty() {
            return Ok(ast.errors);
        }

        let module = maqui_ir::lower(&ast)?;
        self.build(&module)?;
        Ok(Vec::new())
    }

    /// Runs the front end only, producing the annotated AST.
    pub fn analyze_file(&self, path: &Path) -> Result<Ast> {
        let src = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok(self.analyze(&path.to_string_lossy(), &src))
    }

    pub fn analyze(&self, filename: &str, src: &str) -> Ast {
        let lexer = Lexer::new(filename, src);
        let parser = Parser::new(lexer.stream());
        let mut analyzer = Analyzer::new(parser.stream());

        let mut global = SymbolTable::global();
        analyzer.declare_into(&mut global);
        analyzer.analyze(global)
    }

    /// Feeds the IR module to `clang -x ir` over stdin. The backend's
    /// combined output is surfaced on failure.
    pub fn build(&self, module: &Module) -> Result<()> {
        let mut child = Command::new("clang")
            .args(["-x", "ir"])
            .arg(format!("--target={}", self.target))
            .args(["-o", self.target.output_name(), "-"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .context("failed to spawn clang")?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| anyhow!("clang stdin was not captured"))?;
        let ir_text = module.to_string();
        let writer = thread::spawn(move || stdin.write_all(ir_text.as_bytes()));

        let output = child.wait_with_output().context("failed to run clang")?;
        let write_result = writer
            .join()
            .map_err(|_| anyhow!("IR writer thread panicked"))?;

        if !output.status.success() {
            let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));
            return Err(anyhow!(
                "clang exited with {}: {}",
                output.status,
                combined.trim_end()
            ));
        }

        write_result.context("failed to write IR to clang")?;
        Ok(())
    }
}
