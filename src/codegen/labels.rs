/*
Copyright 2025 Connor Nolan

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

/// Labels below this value collide with the two reserved control-destination
/// tags (`RET`, `NEXT`), so generated labels start one past it.
pub const FIRST_LABEL: u32 = 100;

/// Issues fresh, monotonically increasing numeric labels, rendered `L<n>`.
pub struct LabelGenerator {
    next: u32,
}

impl Default for LabelGenerator {
    fn default() -> Self {
        Self {
            next: FIRST_LABEL - 1,
        }
    }
}

impl LabelGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fresh(&mut self) -> u32 {
        self.next += 1;
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_monotonic_and_unique() {
        let mut gen = LabelGenerator::new();
        let a = gen.fresh();
        let b = gen.fresh();
        let c = gen.fresh();
        assert_eq!(a, 100);
        assert_eq!(b, 101);
        assert_eq!(c, 102);
    }
}
