use std::{fs::File, io::BufWriter, path::Path};

use color_eyre::eyre::{self, Context};

use crate::{chain::StopReason, sequence::Sequenced};

/// The frame the chain started at
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Start {
    pub frame: String,
    pub centroid_distance: f64,
}

/// A frame appended to the chain, and its distance to the one before it
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Placed {
    pub frame: String,
    pub distance: f64,
    pub early_exit: bool,
}

/// Everything about how a chain came to be, for figuring out why some transition looks
/// bad.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Report {
    pub start: Start,
    pub placed: Vec<Placed>,
    pub unplaced: Vec<String>,
    pub excluded: Vec<String>,
    pub stop: StopReason,
}

fn display(path: impl AsRef<Path>) -> String {
    path.as_ref().to_string_lossy().into_owned()
}

impl Report {
    pub fn new<Id: AsRef<Path>>(
        sequenced: &Sequenced<Id>,
        excluded: impl IntoIterator<Item = impl AsRef<Path>>,
    ) -> Self {
        let chain = &sequenced.chain;
        let (start, rest) = chain
            .ids
            .split_first()
            .expect("a chain always contains its start");

        Self {
            start: Start {
                frame: display(start),
                centroid_distance: sequenced.start.distance,
            },
            placed: rest
                .iter()
                .zip(&chain.steps)
                .map(|(id, step)| Placed {
                    frame: display(id),
                    distance: step.distance,
                    early_exit: step.early_exit,
                })
                .collect(),
            unplaced: chain.unplaced.iter().map(display).collect(),
            excluded: excluded.into_iter().map(display).collect(),
            stop: chain.stop,
        }
    }

    pub fn save_to(&self, writer: impl std::io::Write) -> ron::Result<()> {
        let conf = ron::ser::PrettyConfig::new().struct_names(true);
        ron::ser::to_writer_pretty(writer, self, conf)
    }

    pub fn read_from(reader: impl std::io::Read) -> ron::error::SpannedResult<Self> {
        ron::de::from_reader(reader)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> eyre::Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .wrap_err_with(|| format!("failed to create the report at: {}", path.display()))?;
        self.save_to(BufWriter::new(file))
            .wrap_err_with(|| format!("failed to write the report at: {}", path.display()))
    }
}
