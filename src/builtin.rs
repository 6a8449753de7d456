use crate::command::Filesystem;
use crate::env::Environment;
use anyhow::{Context, Result, anyhow};
use std::fs;
use std::io::{ErrorKind, Read, Write};
use std::path::{MAIN_SEPARATOR, Path, PathBuf};

const COPY_BUFFER_SIZE: usize = 8 * 1024;

/// [`Filesystem`] backed by the host's file APIs.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostFilesystem;

impl Filesystem for HostFilesystem {
    fn list(&mut self, env: &Environment, stdout: &mut dyn Write) -> Result<()> {
        let entries = fs::read_dir(&env.current_dir).context("unable to open directory")?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.context("unable to read from directory")?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();

        writeln!(stdout, "{}", names.join(" "))?;
        Ok(())
    }

    fn print_working_dir(&mut self, env: &Environment, stdout: &mut dyn Write) -> Result<()> {
        writeln!(stdout, "{}", env.current_dir.to_string_lossy())?;
        Ok(())
    }

    fn make_dir(&mut self, env: &Environment, name: &str) -> Result<()> {
        let path = env.resolve(name);
        fs::create_dir(&path)
            .with_context(|| format!("mkdir {}", path.display()))
            .context("could not create given directory")
    }

    fn change_dir(&mut self, env: &mut Environment, target: &str) -> Result<()> {
        let new_dir = match target {
            "." => return Ok(()),
            ".." => parent_by_separator(&env.current_dir)
                .ok_or_else(|| anyhow!("{} has no parent", env.current_dir.display()))
                .context("Wasn't able to change the directory")?,
            other => {
                let resolved = env.resolve(other);
                fs::canonicalize(&resolved)
                    .with_context(|| format!("cd: can't canonicalize {}", resolved.display()))
                    .context("Wasn't able to change the directory")?
            }
        };

        if !new_dir.is_dir() {
            return Err(anyhow!("{} is not a directory", new_dir.display()))
                .context("Wasn't able to change the directory");
        }
        env.current_dir = new_dir;
        Ok(())
    }

    fn copy_file(&mut self, env: &Environment, source: &str, dest_dir: &str) -> Result<()> {
        let source_path = env.resolve(source);
        let mut input = fs::File::open(&source_path)
            .with_context(|| format!("open {}", source_path.display()))
            .context("Can't open input file")?;

        let dest_dir = env.resolve(dest_dir);
        if !dest_dir.is_dir() {
            return Err(anyhow!("{} is not a directory", dest_dir.display()))
                .context("Can't change directory to destination");
        }

        let file_name = source.rsplit('/').next().unwrap_or(source);
        let dest_path = dest_dir.join(file_name);
        if same_file(&source_path, &dest_path) {
            return Err(anyhow!("{} is the source file", dest_path.display()))
                .context("Can't open destination file");
        }
        let mut output = fs::File::create(&dest_path)
            .with_context(|| format!("create {}", dest_path.display()))
            .context("Can't open destination file")?;

        pump(&mut input, &mut output)
    }

    fn move_file(&mut self, env: &Environment, source: &str, dest: &str) -> Result<()> {
        let (from, to) = (env.resolve(source), env.resolve(dest));
        fs::rename(&from, &to)
            .with_context(|| format!("rename {} -> {}", from.display(), to.display()))
            .context("can't move file")
    }

    fn delete_file(&mut self, env: &Environment, name: &str) -> Result<()> {
        let path = env.resolve(name);
        fs::remove_file(&path)
            .with_context(|| format!("unlink {}", path.display()))
            .context("can't delete file")
    }

    fn display_file(
        &mut self,
        env: &Environment,
        name: &str,
        stdout: &mut dyn Write,
    ) -> Result<()> {
        let path = env.resolve(name);
        let mut input = fs::File::open(&path)
            .with_context(|| format!("open {}", path.display()))
            .context("can't open file")?;

        pump(&mut input, stdout)?;
        writeln!(stdout)?;
        Ok(())
    }
}

/// Parent of `dir`, found by cutting at the last path separator.
///
/// A directory directly below the root has the root as parent; the root itself has none.
fn parent_by_separator(dir: &Path) -> Option<PathBuf> {
    let text = dir.to_string_lossy();
    let idx = text.rfind(MAIN_SEPARATOR)?;
    let head = &text[..idx];
    if !head.is_empty() {
        Some(PathBuf::from(head))
    } else if text.len() > MAIN_SEPARATOR.len_utf8() {
        Some(PathBuf::from(MAIN_SEPARATOR.to_string()))
    } else {
        None
    }
}

/// Both paths exist and name the same file.
fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Copy all bytes from `input` to `output`, telling read failures apart from write failures.
fn pump(input: &mut dyn Read, output: &mut dyn Write) -> Result<()> {
    let mut buffer = [0u8; COPY_BUFFER_SIZE];
    loop {
        let n = match input.read(&mut buffer) {
            Ok(0) => return Ok(()),
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e).context("read error"),
        };
        output.write_all(&buffer[..n]).context("write error")?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env as stdenv;
    use std::io;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn make_unique_temp_dir(tag: &str) -> io::Result<PathBuf> {
        let mut p = stdenv::temp_dir();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        p.push(format!("pseudo_shell_{}_{}_{}", tag, std::process::id(), nanos));
        fs::create_dir_all(&p)?;
        fs::canonicalize(p)
    }

    fn env_in(dir: &Path) -> Environment {
        Environment::at(dir)
    }

    #[test]
    fn test_pwd_prints_current_dir() {
        let env = Environment::at("/tmp/somewhere");
        let mut out = Vec::new();
        HostFilesystem.print_working_dir(&env, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "/tmp/somewhere\n");
    }

    #[test]
    fn test_ls_lists_sorted_entries() {
        let temp = make_unique_temp_dir("ls").expect("failed to create temp dir");
        fs::write(temp.join("b.txt"), "b").unwrap();
        fs::write(temp.join("a.txt"), "a").unwrap();
        fs::create_dir(temp.join("sub")).unwrap();

        let mut out = Vec::new();
        HostFilesystem.list(&env_in(&temp), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a.txt b.txt sub\n");

        let _ = fs::remove_dir_all(&temp);
    }

    #[test]
    fn test_mkdir_creates_and_rejects_existing() {
        let temp = make_unique_temp_dir("mkdir").expect("failed to create temp dir");
        let env = env_in(&temp);

        HostFilesystem.make_dir(&env, "foo").unwrap();
        assert!(temp.join("foo").is_dir());

        let err = HostFilesystem.make_dir(&env, "foo").unwrap_err();
        assert_eq!(err.to_string(), "could not create given directory");

        let _ = fs::remove_dir_all(&temp);
    }

    #[test]
    fn test_cd_relative_dot_and_dotdot() {
        let temp = make_unique_temp_dir("cd").expect("failed to create temp dir");
        fs::create_dir(temp.join("inner")).unwrap();
        let mut env = env_in(&temp);
        let orig_cwd = stdenv::current_dir().unwrap();

        HostFilesystem.change_dir(&mut env, "inner").unwrap();
        assert_eq!(env.current_dir, temp.join("inner"));

        HostFilesystem.change_dir(&mut env, ".").unwrap();
        assert_eq!(env.current_dir, temp.join("inner"));

        HostFilesystem.change_dir(&mut env, "..").unwrap();
        assert_eq!(env.current_dir, temp);

        // the process working directory is never touched
        assert_eq!(stdenv::current_dir().unwrap(), orig_cwd);

        let _ = fs::remove_dir_all(&temp);
    }

    #[test]
    fn test_cd_nonexistent_path_errors() {
        let temp = make_unique_temp_dir("cd_missing").expect("failed to create temp dir");
        let mut env = env_in(&temp);

        let err = HostFilesystem.change_dir(&mut env, "nope").unwrap_err();
        assert_eq!(err.to_string(), "Wasn't able to change the directory");
        assert_eq!(env.current_dir, temp);

        fs::write(temp.join("plain"), "x").unwrap();
        assert!(HostFilesystem.change_dir(&mut env, "plain").is_err());
        assert_eq!(env.current_dir, temp);

        let _ = fs::remove_dir_all(&temp);
    }

    #[test]
    fn test_cd_dotdot_at_root_errors() {
        let mut env = Environment::at("/");
        assert!(HostFilesystem.change_dir(&mut env, "..").is_err());
        assert_eq!(env.current_dir, PathBuf::from("/"));
    }

    #[test]
    fn test_parent_by_separator() {
        assert_eq!(
            parent_by_separator(Path::new("/home/user")),
            Some(PathBuf::from("/home"))
        );
        assert_eq!(
            parent_by_separator(Path::new("/home")),
            Some(PathBuf::from("/"))
        );
        assert_eq!(parent_by_separator(Path::new("/")), None);
        assert_eq!(parent_by_separator(Path::new("relative")), None);
    }

    #[test]
    fn test_cp_into_directory_overwrites() {
        let temp = make_unique_temp_dir("cp").expect("failed to create temp dir");
        fs::create_dir(temp.join("dest")).unwrap();
        fs::write(temp.join("a.txt"), b"fresh bytes\x00\x01").unwrap();
        fs::write(temp.join("dest").join("a.txt"), b"stale content that is longer").unwrap();
        let env = env_in(&temp);

        HostFilesystem.copy_file(&env, "a.txt", "dest").unwrap();
        assert_eq!(
            fs::read(temp.join("dest").join("a.txt")).unwrap(),
            b"fresh bytes\x00\x01"
        );
        // cp does not move the session
        assert_eq!(env.current_dir, temp);

        let _ = fs::remove_dir_all(&temp);
    }

    #[test]
    fn test_cp_failures() {
        let temp = make_unique_temp_dir("cp_fail").expect("failed to create temp dir");
        fs::write(temp.join("a.txt"), "a").unwrap();
        let env = env_in(&temp);

        let err = HostFilesystem.copy_file(&env, "missing.txt", ".").unwrap_err();
        assert_eq!(err.to_string(), "Can't open input file");

        let err = HostFilesystem.copy_file(&env, "a.txt", "nowhere").unwrap_err();
        assert_eq!(err.to_string(), "Can't change directory to destination");

        let _ = fs::remove_dir_all(&temp);
    }

    #[test]
    fn test_cp_onto_itself_keeps_source() {
        let temp = make_unique_temp_dir("cp_self").expect("failed to create temp dir");
        fs::create_dir(temp.join("sub")).unwrap();
        fs::write(temp.join("a.txt"), "precious").unwrap();
        let env = env_in(&temp);

        let err = HostFilesystem.copy_file(&env, "a.txt", ".").unwrap_err();
        assert_eq!(err.to_string(), "Can't open destination file");
        assert_eq!(fs::read_to_string(temp.join("a.txt")).unwrap(), "precious");

        let err = HostFilesystem.copy_file(&env, "a.txt", "sub/..").unwrap_err();
        assert_eq!(err.to_string(), "Can't open destination file");
        assert_eq!(fs::read_to_string(temp.join("a.txt")).unwrap(), "precious");

        let _ = fs::remove_dir_all(&temp);
    }

    #[test]
    fn test_mv_and_rm() {
        let temp = make_unique_temp_dir("mv_rm").expect("failed to create temp dir");
        fs::write(temp.join("old.txt"), "data").unwrap();
        let env = env_in(&temp);

        HostFilesystem.move_file(&env, "old.txt", "new.txt").unwrap();
        assert!(!temp.join("old.txt").exists());
        assert_eq!(fs::read_to_string(temp.join("new.txt")).unwrap(), "data");

        HostFilesystem.delete_file(&env, "new.txt").unwrap();
        assert!(!temp.join("new.txt").exists());

        let err = HostFilesystem.delete_file(&env, "new.txt").unwrap_err();
        assert_eq!(err.to_string(), "can't delete file");

        let err = HostFilesystem.move_file(&env, "ghost", "x").unwrap_err();
        assert_eq!(err.to_string(), "can't move file");

        let _ = fs::remove_dir_all(&temp);
    }

    #[test]
    fn test_cat_appends_newline() {
        let temp = make_unique_temp_dir("cat").expect("failed to create temp dir");
        fs::write(temp.join("notes.txt"), "hello\nworld").unwrap();
        let env = env_in(&temp);

        let mut out = Vec::new();
        HostFilesystem
            .display_file(&env, "notes.txt", &mut out)
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "hello\nworld\n");

        let err = HostFilesystem
            .display_file(&env, "absent.txt", &mut Vec::new())
            .unwrap_err();
        assert_eq!(err.to_string(), "can't open file");

        let _ = fs::remove_dir_all(&temp);
    }
}
