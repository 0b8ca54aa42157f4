use crate::{
    chain::{Chain, ChainBuilder, Chaining, Pool},
    outlier::{select_outlier, Outlier},
    signature::Signature,
};

#[derive(Debug, thiserror::Error)]
pub enum SequenceError {
    #[error("there are no frames to order")]
    EmptyInput,
}

#[derive(Debug)]
pub struct Sequenced<Id> {
    /// Where the start frame was in the input, and how far from the average it is
    pub start: Outlier,
    pub chain: Chain<Id>,
}

/// Orders `frames` by starting at the outlier and greedily chaining the rest.
/// `should_stop` is polled between chaining steps.
pub fn sequence<Id: Sync>(
    mut frames: Vec<(Id, Signature)>,
    conf: &Chaining,
    should_stop: impl FnMut() -> bool,
) -> Result<Sequenced<Id>, SequenceError> {
    let start = select_outlier(&frames).ok_or(SequenceError::EmptyInput)?;
    let start_frame = frames.remove(start.index);

    let chain = ChainBuilder::new(start_frame, Pool::new(frames), conf).run(should_stop);
    Ok(Sequenced { start, chain })
}
