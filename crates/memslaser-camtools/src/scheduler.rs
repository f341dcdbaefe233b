//! Drilling order scheduling
//!
//! Works purely on hole indices along the perimeter walk. The arc between two
//! consecutive initial holes is a segment of `2^num_extra_passes` final
//! spacings. All segments share one bisection template, so the polygon-wide
//! schedule is produced in time linear in the hole count.

/// Local hole indices revealed by each extra pass within one segment
///
/// Local index 0 and `segment_width` are the bounding initial holes and never
/// appear in the template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentTemplate {
    num_extra_passes: u32,
    passes: Vec<Vec<usize>>,
}

impl SegmentTemplate {
    /// Bisect the closed local range `[0, 2^num_extra_passes]`
    pub fn new(num_extra_passes: u32) -> Self {
        let segment_width = 1usize << num_extra_passes;
        let mut passes = vec![Vec::new(); num_extra_passes as usize];
        let indices: Vec<usize> = (0..=segment_width).collect();
        bisect(&indices, 0, &mut passes);
        Self {
            num_extra_passes,
            passes,
        }
    }

    pub fn passes(&self) -> &[Vec<usize>] {
        &self.passes
    }

    pub fn num_extra_passes(&self) -> u32 {
        self.num_extra_passes
    }

    /// Number of final spacings per segment
    pub fn segment_width(&self) -> usize {
        1usize << self.num_extra_passes
    }

    /// True when there are no extra passes
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

fn bisect(partition: &[usize], depth: usize, passes: &mut [Vec<usize>]) {
    if partition.len() < 3 {
        return;
    }
    let mid = (partition.len() - 1) / 2;
    passes[depth].push(partition[mid]);
    if partition.len() == 3 {
        return;
    }
    bisect(&partition[..=mid], depth + 1, passes);
    bisect(&partition[mid..], depth + 1, passes);
}

/// Global hole indices of every pass, initial pass first
///
/// Pass 0 holds the segment boundaries in ascending order. Each later pass
/// visits the segments in ascending order and appends the template indices
/// offset by the segment start.
pub fn schedule_hole_indices(template: &SegmentTemplate, initial_num_holes: usize) -> Vec<Vec<usize>> {
    let width = template.segment_width();
    let mut schedule = Vec::with_capacity(template.passes().len() + 1);
    schedule.push((0..initial_num_holes).map(|segment| segment * width).collect());

    for local_indices in template.passes() {
        let mut pass = Vec::with_capacity(local_indices.len() * initial_num_holes);
        for segment in 0..initial_num_holes {
            let offset = segment * width;
            pass.extend(local_indices.iter().map(|local| local + offset));
        }
        schedule.push(pass);
    }

    schedule
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates() {
        assert!(SegmentTemplate::new(0).is_empty());
        assert_eq!(SegmentTemplate::new(1).passes(), &[vec![1]]);
        assert_eq!(SegmentTemplate::new(2).passes(), &[vec![2], vec![1, 3]]);
        assert_eq!(
            SegmentTemplate::new(3).passes(),
            &[vec![4], vec![2, 6], vec![1, 3, 5, 7]]
        );
    }

    #[test]
    fn test_template_covers_interior_once() {
        let template = SegmentTemplate::new(6);
        let mut seen: Vec<usize> = template.passes().iter().flatten().copied().collect();
        seen.sort_unstable();
        assert_eq!(seen, (1..template.segment_width()).collect::<Vec<_>>());
        for (depth, pass) in template.passes().iter().enumerate() {
            assert_eq!(pass.len(), 1 << depth);
        }
    }

    #[test]
    fn test_zero_extra_passes_schedule() {
        let schedule = schedule_hole_indices(&SegmentTemplate::new(0), 5);
        assert_eq!(schedule, vec![vec![0, 1, 2, 3, 4]]);
    }

    #[test]
    fn test_schedule_square() {
        let schedule = schedule_hole_indices(&SegmentTemplate::new(2), 4);
        assert_eq!(
            schedule,
            vec![
                vec![0, 4, 8, 12],
                vec![2, 6, 10, 14],
                vec![1, 3, 5, 7, 9, 11, 13, 15],
            ]
        );
    }

    #[test]
    fn test_template_reuse_matches_per_segment_bisection() {
        let (initial_num_holes, num_extra_passes) = (3, 2);
        let template = SegmentTemplate::new(num_extra_passes);
        let width = template.segment_width();
        let total = initial_num_holes * width;

        // Bisect every segment of the closed global index range on its own
        let mut expected = vec![Vec::new(); num_extra_passes as usize];
        for segment in 0..initial_num_holes {
            let indices: Vec<usize> = (segment * width..=(segment + 1) * width).collect();
            let mut passes = vec![Vec::new(); num_extra_passes as usize];
            bisect(&indices, 0, &mut passes);
            for (pass, revealed) in expected.iter_mut().zip(passes) {
                pass.extend(revealed);
            }
        }

        let schedule = schedule_hole_indices(&template, initial_num_holes);
        assert_eq!(schedule[0], vec![0, 4, 8]);
        assert_eq!(&schedule[1..], expected.as_slice());
        assert!(schedule.iter().flatten().all(|&i| i < total));
    }
}
