// Overlap test for textual clipping locations.
//
// The export records where a clipping lives either as a single number
// ("1504") or as a range ("120-123"). A note placed on a highlighted
// passage usually carries a single location inside the highlight's range;
// this predicate decides whether two location expressions refer to the
// same passage so the merge buffer can pair them up.
//
// Unparsable parts behave like NaN: every comparison involving one is
// false, so empty or garbage expressions never match anything, including
// themselves.

/// Split a location expression on `-` and parse each part. One part is a
/// single location, two parts a range; anything else is unusable.
fn parse_parts(expr: &str) -> Vec<Option<i64>> {
    expr.split('-').map(|p| p.trim().parse::<i64>().ok()).collect()
}

fn within(value: Option<i64>, min: Option<i64>, max: Option<i64>) -> bool {
    match (value, min, max) {
        (Some(v), Some(lo), Some(hi)) => v >= lo && v <= hi,
        _ => false,
    }
}

/// True when two location expressions refer to overlapping passages.
///
/// Range vs range only tests the FIRST expression's endpoints against the
/// second's bounds, so a range that fully contains the other matches in
/// one argument order but not the other ("6-7" vs "5-10" is true,
/// "5-10" vs "6-7" is false). Longstanding behavior; callers scan notes
/// against highlights, where the note side is the narrower one.
pub fn locations_overlap(a: &str, b: &str) -> bool {
    let pa = parse_parts(a);
    let pb = parse_parts(b);

    match (pa.as_slice(), pb.as_slice()) {
        ([x], [y]) => x.is_some() && x == y,
        ([lo, hi], [y]) => within(*y, *lo, *hi),
        ([x], [lo, hi]) => within(*x, *lo, *hi),
        ([lo1, hi1], [lo2, hi2]) => within(*lo1, *lo2, *hi2) || within(*hi1, *lo2, *hi2),
        _ => false,
    }
}
