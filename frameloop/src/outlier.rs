use crate::signature::Signature;

/// The frame farthest away from the average frame. Starting the chain there avoids
/// near-ties on the very first step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Outlier {
    pub index: usize,
    pub distance: f64,
}

/// Elementwise mean of all signatures, `None` if there are none.
pub fn centroid<'a>(signatures: impl IntoIterator<Item = &'a Signature>) -> Option<Signature> {
    let mut signatures = signatures.into_iter();
    let first = signatures.next()?;
    let (width, height) = first.dimensions();

    let mut sums: Vec<f64> = first.values().iter().copied().map(f64::from).collect();
    let mut count = 1usize;
    for sig in signatures {
        assert_eq!(
            (width, height),
            sig.dimensions(),
            "signatures of different sizes can't be averaged"
        );
        sums.iter_mut()
            .zip(sig.values())
            .for_each(|(sum, &value)| *sum += f64::from(value));
        count += 1;
    }

    let values = sums
        .into_iter()
        .map(|sum| (sum / count as f64) as f32)
        .collect();
    Signature::new(width, height, values).ok()
}

/// Picks the frame with the strictly greatest distance to the centroid, the first one
/// wins ties. Falls back to the first frame if no distance is comparable.
pub fn select_outlier<Id>(frames: &[(Id, Signature)]) -> Option<Outlier> {
    let center = centroid(frames.iter().map(|(_, sig)| sig))?;

    let distances: Vec<f64> = frames.iter().map(|(_, sig)| sig.distance(&center)).collect();
    let mut best = Outlier {
        index: 0,
        distance: distances[0],
    };
    for (index, &distance) in distances.iter().enumerate().skip(1) {
        if distance > best.distance || (best.distance.is_nan() && !distance.is_nan()) {
            best = Outlier { index, distance };
        }
    }

    Some(best)
}

#[cfg(test)]
mod test {
    use super::*;

    fn frames(values: &[f32]) -> Vec<(usize, Signature)> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| (i, Signature::uniform(4, 4, v)))
            .collect()
    }

    #[test]
    fn empty_has_no_outlier() {
        assert_eq!(None, centroid(Vec::<&Signature>::new()));
        assert_eq!(None, select_outlier::<usize>(&[]));
    }

    #[test]
    fn centroid_is_elementwise_mean() {
        let a = Signature::new(2, 1, vec![0.0, 10.0]).unwrap();
        let b = Signature::new(2, 1, vec![4.0, 20.0]).unwrap();
        let c = centroid([&a, &b]).unwrap();
        assert_eq!(&[2.0, 15.0], c.values());
    }

    #[test]
    fn picks_the_bright_one() {
        let outlier = select_outlier(&frames(&[0.0, 0.0, 255.0])).unwrap();
        assert_eq!(2, outlier.index);
        assert_eq!(16.0 * 170.0 * 170.0, outlier.distance);
    }

    #[test]
    fn single_frame() {
        let outlier = select_outlier(&frames(&[42.0])).unwrap();
        assert_eq!(Outlier { index: 0, distance: 0.0 }, outlier);
    }

    #[test]
    fn ties_go_to_the_first() {
        // 0 and 100 are equally far from 50
        let outlier = select_outlier(&frames(&[50.0, 0.0, 100.0])).unwrap();
        assert_eq!(1, outlier.index);

        let outlier = select_outlier(&frames(&[7.0, 7.0, 7.0])).unwrap();
        assert_eq!(0, outlier.index);
    }

    #[test]
    fn all_incomparable_falls_back_to_first() {
        let mut frames = frames(&[0.0, 10.0]);
        frames.push((2, Signature::uniform(4, 4, f32::NAN)));
        // every distance to a NaN centroid is NaN
        let outlier = select_outlier(&frames).unwrap();
        assert_eq!(0, outlier.index);
        assert!(outlier.distance.is_nan());
    }
}
