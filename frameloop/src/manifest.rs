//! Playlist for ffmpeg's concat demuxer, and the commands to turn it into a movie.
//!
//! The first frame is written at both ends with a zero duration. The leading one sets
//! the initial state for frame blending without taking up time, the trailing one makes
//! the blending transition from the last frame back to the start, closing the loop.

use std::{
    fmt,
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use color_eyre::eyre::{self, Context};
use frameloop_common::args;

args! {
    #[derive(Clone)]
    Encode {
        "Frame rate of the movie"
        fps: f64 = 24.0;

        "Where to write the concat playlist"
        list: String = "reassembled_list.txt".to_string();

        "The movie the suggested command encodes to"
        output: String = "reassembled_movie.mp4".to_string();

        "Frame rate the suggested frame interpolation command blends up to"
        morph_fps: f64 = 30.0;

        "The movie the suggested frame interpolation command encodes to"
        morph_output: String = "morph_slideshow.mp4".to_string();
    }
}

impl Encode {
    pub fn frame_rate(&self) -> f64 {
        self.fps
    }

    pub fn list_path(&self) -> &Path {
        Path::new(&self.list)
    }
}

/// Escapes single quotes for a single quoted string in the concat demuxer syntax, which
/// follows the shell's.
pub fn escape_path(path: &str) -> String {
    path.replace('\'', r"'\''")
}

/// Quotes `arg` for a POSIX shell, if needed
pub fn shell_quote(arg: &str) -> String {
    let is_plain = |c: char| c.is_ascii_alphanumeric() || "_-+./:,=@%".contains(c);
    if !arg.is_empty() && arg.chars().all(is_plain) {
        arg.to_string()
    } else {
        format!("'{}'", escape_path(arg))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Entry {
    pub path: String,
    /// In seconds
    pub duration: f64,
}

impl Entry {
    /// The playlist is text, so a path that isn't UTF-8 is converted lossily and will
    /// not point at the frame anymore. [`crate::frames::discover`] never returns such
    /// paths.
    fn new(path: impl AsRef<Path>, duration: f64) -> Self {
        let path = path.as_ref();
        let text = path.to_string_lossy();
        if path.to_str().is_none() {
            log::warn!("The playlist entry for {path:?} is not valid UTF-8: {text}");
        }
        Self {
            path: text.into_owned(),
            duration,
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "file '{}'", escape_path(&self.path))?;
        write!(f, "duration {}", self.duration)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Manifest {
    entries: Vec<Entry>,
}

impl Manifest {
    pub fn new<Id: AsRef<Path>>(chain: &[Id], fps: f64) -> Self {
        let Some((first, rest)) = chain.split_first() else {
            return Self { entries: vec![] };
        };

        let frame_duration = 1.0 / fps;
        let mut entries = Vec::with_capacity(chain.len() + 1);
        entries.push(Entry::new(first, 0.0));
        entries.extend(rest.iter().map(|id| Entry::new(id, frame_duration)));
        entries.push(Entry::new(first, 0.0));
        Self { entries }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn write_to(&self, mut writer: impl Write) -> io::Result<()> {
        for entry in &self.entries {
            writeln!(writer, "{entry}")?;
        }
        Ok(())
    }

    pub fn save(&self, path: impl AsRef<Path>) -> eyre::Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .wrap_err_with(|| format!("failed to create the playlist at: {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)
            .and_then(|()| writer.flush())
            .wrap_err_with(|| format!("failed to write the playlist at: {}", path.display()))
    }
}

impl fmt::Display for Manifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{entry}")?;
        }
        Ok(())
    }
}

/// Suggested ffmpeg invocations for a written playlist
#[derive(Clone, Debug)]
pub struct EncodeCommands {
    /// Plays the frames as they are
    pub concat: String,
    /// Motion compensated interpolation between the frames. Slow.
    pub interpolate: String,
}

impl EncodeCommands {
    pub fn new(conf: &Encode) -> Self {
        let list = shell_quote(&conf.list);
        let input = format!("ffmpeg -f concat -safe 0 -i {list}");
        let concat = format!(
            "{input} -r {} -pix_fmt yuv420p {}",
            conf.fps,
            shell_quote(&conf.output)
        );
        let interpolate = format!(
            "{input} -vf \"minterpolate=fps={}:mi_mode=mci:mc_mode=aobmc:me_mode=bidir:vsbmc=1\" \
             -pix_fmt yuv420p {}",
            conf.morph_fps,
            shell_quote(&conf.morph_output)
        );
        Self {
            concat,
            interpolate,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn lines(manifest: &Manifest) -> Vec<String> {
        manifest.to_string().lines().map(str::to_string).collect()
    }

    #[test]
    fn bookends() {
        let manifest = Manifest::new(&["A", "B", "C"], 24.0);
        assert_eq!(
            vec![
                "file 'A'",
                "duration 0",
                "file 'B'",
                "duration 0.041666666666666664",
                "file 'C'",
                "duration 0.041666666666666664",
                "file 'A'",
                "duration 0",
            ],
            lines(&manifest)
        );
    }

    #[test]
    fn single_frame() {
        let manifest = Manifest::new(&["only.png"], 24.0);
        assert_eq!(
            vec!["file 'only.png'", "duration 0", "file 'only.png'", "duration 0"],
            lines(&manifest)
        );
    }

    #[test]
    fn empty_chain_is_empty() {
        let manifest = Manifest::new::<&str>(&[], 24.0);
        assert!(manifest.entries().is_empty());
        assert_eq!("", manifest.to_string());
    }

    #[test]
    fn quotes_are_escaped() {
        assert_eq!(r"it'\''s.png", escape_path("it's.png"));

        let manifest = Manifest::new(&["frames/it's.png", "b.png"], 10.0);
        let lines = lines(&manifest);
        assert_eq!(r"file 'frames/it'\''s.png'", lines[0]);
        assert_eq!("duration 0.1", lines[3]);
        assert_eq!(lines[0], lines[4]);
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_paths_are_lossy() {
        use std::{ffi::OsStr, os::unix::ffi::OsStrExt};

        let weird = Path::new(OsStr::from_bytes(b"fr\xffme.png"));
        let manifest = Manifest::new(&[weird], 24.0);
        assert_eq!("fr\u{FFFD}me.png", manifest.entries()[0].path);
    }

    #[test]
    fn write_to_matches_display() {
        let manifest = Manifest::new(&["x", "y"], 30.0);
        let mut buf = Vec::new();
        manifest.write_to(&mut buf).unwrap();
        assert_eq!(manifest.to_string(), String::from_utf8(buf).unwrap());
    }

    #[test]
    fn save_to_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = Manifest::new(&["x"], 24.0);
        assert!(manifest.save(dir.path().join("nope").join("list.txt")).is_err());

        let path = dir.path().join("list.txt");
        manifest.save(&path).unwrap();
        assert_eq!(manifest.to_string(), std::fs::read_to_string(path).unwrap());
    }

    #[test]
    fn shell_quoting() {
        assert_eq!("movie.mp4", shell_quote("movie.mp4"));
        assert_eq!("'my movie.mp4'", shell_quote("my movie.mp4"));
        assert_eq!(r"'it'\''s.mp4'", shell_quote("it's.mp4"));
        assert_eq!("''", shell_quote(""));
    }

    #[test]
    fn default_commands() {
        let cmds = EncodeCommands::new(&Encode::default());
        assert_eq!(
            "ffmpeg -f concat -safe 0 -i reassembled_list.txt -r 24 -pix_fmt yuv420p \
             reassembled_movie.mp4",
            cmds.concat
        );
        assert_eq!(
            "ffmpeg -f concat -safe 0 -i reassembled_list.txt -vf \
             \"minterpolate=fps=30:mi_mode=mci:mc_mode=aobmc:me_mode=bidir:vsbmc=1\" \
             -pix_fmt yuv420p morph_slideshow.mp4",
            cmds.interpolate
        );
    }
}
