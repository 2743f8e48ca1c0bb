use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{check_counts, BlockViolation, CountRule};

/// Content shared by every step kind. The lane, when set, names the group
/// responsible for the step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDetail {
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lane: Option<String>,
}

/// A top-level step in a process stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum StepBlock {
    Task(StepDetail),
    Event(StepDetail),
    Document(DocumentStep),
    ExclusiveGateway(Vec<GatewayOption>),
    End(StepDetail),
}

impl StepBlock {
    pub const fn kind(&self) -> &'static str {
        match self {
            StepBlock::Task(_) => "task",
            StepBlock::Event(_) => "event",
            StepBlock::Document(_) => "document",
            StepBlock::ExclusiveGateway(_) => "exclusive_gateway",
            StepBlock::End(_) => "end",
        }
    }
}

/// A step that references a supporting document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStep {
    #[serde(flatten)]
    pub detail: StepDetail,
    pub document: String,
}

/// One branch of an exclusive gateway: the steps taken when this option is
/// chosen. Branches cannot end the process or nest further gateways.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayOption {
    pub steps: Vec<BranchStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum BranchStep {
    Task(StepDetail),
    Event(StepDetail),
    Document(DocumentStep),
}

impl BranchStep {
    pub const fn kind(&self) -> &'static str {
        match self {
            BranchStep::Task(_) => "task",
            BranchStep::Event(_) => "event",
            BranchStep::Document(_) => "document",
        }
    }

    fn detail(&self) -> &StepDetail {
        match self {
            BranchStep::Task(detail) | BranchStep::Event(detail) => detail,
            BranchStep::Document(step) => &step.detail,
        }
    }
}

/// A documented business process: exactly one start and the ordered steps
/// toward at least one end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Process {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start: Vec<StepDetail>,
    pub steps: Vec<StepBlock>,
}

impl Process {
    /// Checks structural rules: one start, at least one top-level end, no
    /// blank labels, gateways with at least one non-empty option, and
    /// document steps that actually name a document.
    pub fn validate(&self) -> Vec<BlockViolation> {
        let mut violations = Vec::new();

        let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
        counts.insert("start", self.start.len());
        counts.insert(
            "end",
            self.steps
                .iter()
                .filter(|step| matches!(step, StepBlock::End(_)))
                .count(),
        );
        violations.extend(check_counts(
            &counts,
            &[
                CountRule {
                    block: "start",
                    min: Some(1),
                    max: Some(1),
                },
                CountRule {
                    block: "end",
                    min: Some(1),
                    max: None,
                },
            ],
        ));

        for (index, start) in self.start.iter().enumerate() {
            if start.label.trim().is_empty() {
                violations.push(BlockViolation::at(index, "start", "step label is required"));
            }
        }

        for (index, step) in self.steps.iter().enumerate() {
            match step {
                StepBlock::Task(detail) | StepBlock::Event(detail) | StepBlock::End(detail) => {
                    if detail.label.trim().is_empty() {
                        violations.push(BlockViolation::at(
                            index,
                            step.kind(),
                            "step label is required",
                        ));
                    }
                }
                StepBlock::Document(doc) => {
                    if doc.detail.label.trim().is_empty() {
                        violations.push(BlockViolation::at(
                            index,
                            step.kind(),
                            "step label is required",
                        ));
                    }
                    if doc.document.trim().is_empty() {
                        violations.push(BlockViolation::at(
                            index,
                            step.kind(),
                            "document reference is required",
                        ));
                    }
                }
                StepBlock::ExclusiveGateway(options) => {
                    if options.is_empty() {
                        violations.push(BlockViolation::at(
                            index,
                            step.kind(),
                            "gateway needs at least one option",
                        ));
                    }
                    for option in options {
                        if option.steps.is_empty() {
                            violations.push(BlockViolation::at(
                                index,
                                step.kind(),
                                "gateway option needs at least one step",
                            ));
                        }
                        for branch in &option.steps {
                            if branch.detail().label.trim().is_empty() {
                                violations.push(BlockViolation::at(
                                    index,
                                    branch.kind(),
                                    "step label is required",
                                ));
                            }
                            if let BranchStep::Document(doc) = branch {
                                if doc.document.trim().is_empty() {
                                    violations.push(BlockViolation::at(
                                        index,
                                        branch.kind(),
                                        "document reference is required",
                                    ));
                                }
                            }
                        }
                    }
                }
            }
        }

        violations
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(label: &str) -> StepDetail {
        StepDetail {
            label: label.to_string(),
            description: String::new(),
            lane: None,
        }
    }

    fn baking_process() -> Process {
        Process {
            slug: "morning-bake".to_string(),
            title: "Morning bake".to_string(),
            description: "From mixing to the shop shelf.".to_string(),
            start: vec![step("Doors open")],
            steps: vec![
                StepBlock::Task(step("Mix dough")),
                StepBlock::ExclusiveGateway(vec![
                    GatewayOption {
                        steps: vec![BranchStep::Task(step("Proof overnight"))],
                    },
                    GatewayOption {
                        steps: vec![BranchStep::Task(step("Proof for two hours"))],
                    },
                ]),
                StepBlock::Document(DocumentStep {
                    detail: step("Record oven temperatures"),
                    document: "docs/oven-log".to_string(),
                }),
                StepBlock::End(step("Shelves stocked")),
            ],
        }
    }

    #[test]
    fn well_formed_process_validates() {
        assert!(baking_process().is_valid());
    }

    #[test]
    fn missing_end_step_is_reported() {
        let mut process = baking_process();
        process.steps.retain(|step| !matches!(step, StepBlock::End(_)));

        let violations = process.validate();
        assert!(violations
            .iter()
            .any(|violation| violation.block == "end" && violation.index.is_none()));
    }

    #[test]
    fn exactly_one_start_is_enforced() {
        let mut process = baking_process();
        process.start.push(step("Another start"));
        assert!(!process.is_valid());

        process.start.clear();
        assert!(!process.is_valid());
    }

    #[test]
    fn empty_gateway_options_are_flagged() {
        let mut process = baking_process();
        process.steps[1] = StepBlock::ExclusiveGateway(vec![GatewayOption { steps: vec![] }]);

        let violations = process.validate();
        assert!(violations
            .iter()
            .any(|violation| violation.message.contains("gateway option")));
    }

    #[test]
    fn document_steps_must_reference_a_document() {
        let mut process = baking_process();
        process.steps[2] = StepBlock::Document(DocumentStep {
            detail: step("Record oven temperatures"),
            document: "  ".to_string(),
        });

        let violations = process.validate();
        assert!(violations
            .iter()
            .any(|violation| violation.message.contains("document reference")));
    }

    #[test]
    fn steps_serialize_with_snake_case_tags() {
        let step = StepBlock::ExclusiveGateway(vec![GatewayOption {
            steps: vec![BranchStep::Task(StepDetail {
                label: "Proof".to_string(),
                description: String::new(),
                lane: Some("bakers".to_string()),
            })],
        }]);

        let json = serde_json::to_value(&step).expect("serializes");
        assert_eq!(json["type"], "exclusive_gateway");
        assert_eq!(json["value"][0]["steps"][0]["value"]["lane"], "bakers");
    }
}
