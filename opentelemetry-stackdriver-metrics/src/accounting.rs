use once_cell::sync::Lazy;
use regex::Regex;

use crate::Error;

const PARTIAL_FAILURE_PREFIX: &str = "One or more TimeSeries could not be written:";

/// Matches the rejected index ranges, e.g. `: timeSeries[0-3,7]`.
static REJECTED_RANGES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r": timeSeries\[([0-9]+(?:-[0-9]+)?(?:,[0-9]+(?:-[0-9]+)?)*)\]")
        .expect("rejected ranges pattern is valid")
});

/// Number of series of a request carrying `all` series that were not written
/// because of `error`.
///
/// Partial failures name the rejected series by index. Anything else counts
/// the whole request as dropped.
pub(crate) fn dropped_time_series(all: usize, error: &Error) -> usize {
    let message = error.to_string();
    if !message.starts_with(PARTIAL_FAILURE_PREFIX) {
        return all;
    }

    let mut matched = false;
    let mut dropped = 0;
    for captures in REJECTED_RANGES.captures_iter(&message) {
        matched = true;
        for range in captures[1].split(',') {
            match range_len(range) {
                Some(n) => dropped += n,
                None => return all,
            }
        }
    }

    if matched {
        dropped
    } else {
        all
    }
}

fn range_len(range: &str) -> Option<usize> {
    let (min, max) = match range.split_once('-') {
        Some((min, max)) => (min.parse::<usize>().ok()?, max.parse::<usize>().ok()?),
        None => {
            let index = range.parse::<usize>().ok()?;
            (index, index)
        }
    };
    max.checked_sub(min).map(|n| n + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rpc(message: &str) -> Error {
        Error::Rpc {
            code: tonic::Code::InvalidArgument,
            message: message.into(),
        }
    }

    #[test]
    fn single_index() {
        let err = rpc("One or more TimeSeries could not be written: Field timeSeries[2] had an invalid value: timeSeries[2]");
        assert_eq!(dropped_time_series(5, &err), 1);
    }

    #[test]
    fn ranges_and_indexes() {
        let err = rpc("One or more TimeSeries could not be written: Points must be written in order.: timeSeries[0-3,7]");
        assert_eq!(dropped_time_series(10, &err), 5);
    }

    #[test]
    fn several_matches_are_summed() {
        let err = rpc(
            "One or more TimeSeries could not be written: Unknown metric: timeSeries[0-1]; \
             Points must be written in order: timeSeries[4]",
        );
        assert_eq!(dropped_time_series(5, &err), 3);
    }

    #[test]
    fn unrecognized_errors_drop_everything() {
        assert_eq!(dropped_time_series(5, &rpc("deadline exceeded")), 5);
        assert_eq!(
            dropped_time_series(
                5,
                &rpc("One or more TimeSeries could not be written: internal error")
            ),
            5
        );
        // ranges without the partial failure prefix are not trusted
        assert_eq!(
            dropped_time_series(5, &rpc("Invalid: timeSeries[1]")),
            5
        );
        assert_eq!(
            dropped_time_series(5, &Error::Timeout(std::time::Duration::from_secs(1))),
            5
        );
    }

    #[test]
    fn inverted_range_drops_everything() {
        let err = rpc("One or more TimeSeries could not be written: bad: timeSeries[3-1]");
        assert_eq!(dropped_time_series(5, &err), 5);
    }
}
