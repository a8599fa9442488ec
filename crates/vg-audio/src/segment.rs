use vg_core::report::CrySegment;

/// Extract contiguous cry intervals from a frame classification mask.
///
/// Single left-to-right scan: a false→true transition opens a segment
/// at the current frame's time, a true→false transition closes it at
/// the time of that first non-cry frame. A mask still true at the final
/// frame closes at the last frame's time, never past it. Segments come
/// out non-overlapping and ordered by start time.
///
/// `mask` and `frame_times` must be the same length; extra entries in
/// either are ignored past the shorter one.
///
/// # Example
/// ```
/// use vg_audio::segment::extract;
/// let mask = vec![false, true, true, false, true];
/// let times = vec![0.0, 0.1, 0.2, 0.3, 0.4];
/// let segments = extract(&mask, &times);
/// assert_eq!(segments.len(), 2);
/// assert!((segments[0].start_s - 0.1).abs() < 1e-6);
/// assert!((segments[0].end_s - 0.3).abs() < 1e-6);
/// ```
#[must_use]
pub fn extract(mask: &[bool], frame_times: &[f32]) -> Vec<CrySegment> {
    let mut segments = Vec::new();
    let mut start = 0.0f32;
    let mut in_segment = false;
    let mut last_time = 0.0f32;

    for (&is_cry, &time) in mask.iter().zip(frame_times.iter()) {
        if is_cry && !in_segment {
            in_segment = true;
            start = time;
        } else if !is_cry && in_segment {
            in_segment = false;
            segments.push(CrySegment {
                start_s: start,
                end_s: time,
            });
        }
        last_time = time;
    }

    // Recording ended mid-cry: close at the last frame's time.
    if in_segment {
        segments.push(CrySegment {
            start_s: start,
            end_s: last_time,
        });
    }

    segments
}
