use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Pass/fail outcome of a whole run, in scenario order.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct WorkflowResults {
    pub calendar_connection: bool,
    #[serde(serialize_with = "serialize_outcomes")]
    pub workflows: Vec<(String, bool)>,
}

fn serialize_outcomes<S>(outcomes: &[(String, bool)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(outcomes.len()))?;
    for (name, success) in outcomes {
        map.serialize_entry(name, success)?;
    }
    map.end()
}

fn pass_fail(success: bool) -> &'static str {
    if success {
        "✅ PASS"
    } else {
        "❌ FAIL"
    }
}

impl WorkflowResults {
    pub fn new(calendar_connection: bool) -> WorkflowResults {
        WorkflowResults {
            calendar_connection,
            workflows: Vec::new(),
        }
    }

    /// Records a scenario outcome; a repeated name replaces the earlier entry in place.
    pub fn record(&mut self, name: &str, success: bool) {
        match self.workflows.iter_mut().find(|(existing, _)| existing == name) {
            Some(entry) => entry.1 = success,
            None => self.workflows.push((name.to_string(), success)),
        }
    }

    pub fn all_passed(&self) -> bool {
        self.calendar_connection && self.workflows.iter().all(|(_, success)| *success)
    }

    /// Human-readable summary, one line per entry.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![format!("Calendar Connection: {}", pass_fail(self.calendar_connection))];
        for (name, success) in &self.workflows {
            lines.push(format!("Workflow {}: {}", name, pass_fail(*success)));
        }
        lines
    }

    pub fn print_summary(&self) {
        println!("\n{}", "=".repeat(60));
        println!("TEST SUMMARY");
        println!("{}", "=".repeat(60));
        for line in self.summary_lines() {
            println!("{}", line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_workflows_as_ordered_object() {
        let mut results = WorkflowResults::new(true);
        results.record("Zed", false);
        results.record("Amy", true);
        let text = serde_json::to_string(&results).unwrap();
        assert_eq!(
            text,
            r#"{"calendar_connection":true,"workflows":{"Zed":false,"Amy":true}}"#
        );
        assert_eq!(
            serde_json::to_value(&results).unwrap(),
            json!({"calendar_connection": true, "workflows": {"Zed": false, "Amy": true}})
        );
    }

    #[test]
    fn repeated_names_do_not_duplicate_entries() {
        let mut results = WorkflowResults::new(false);
        results.record("A", true);
        results.record("A", false);
        assert_eq!(results.workflows, vec![("A".to_string(), false)]);
    }

    #[test]
    fn summary_marks_each_entry() {
        let mut results = WorkflowResults::new(false);
        results.record("John", true);
        assert_eq!(
            results.summary_lines(),
            vec!["Calendar Connection: ❌ FAIL", "Workflow John: ✅ PASS"]
        );
        assert!(!results.all_passed());
    }
}
