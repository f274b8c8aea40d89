//! Writing templates: static lookup tables filled in per audience and keywords.

use chrono::{DateTime, Utc};
use wa_core::WritingTemplate;

pub const DEFAULT_KIND: &str = "listicle";
pub const DEFAULT_AUDIENCE: &str = "professional";

struct TemplateSpec {
    name: &'static str,
    title_formula: &'static str,
    structure: [&'static str; 4],
    examples: [&'static str; 2],
}

const LISTICLE: TemplateSpec = TemplateSpec {
    name: "清单型文章",
    title_formula: "{数字} + {核心词} + {人群} + {获得感}",
    structure: [
        "标题：使用具体数字 + 核心关键词 + 目标人群 + 价值承诺",
        "开头：现象描述 + 痛点挖掘 + 解决方案预告",
        "正文：N个要点，每个要点包含解释、案例、数据支撑",
        "结尾：总结要点 + 行动号召 + 互动引导",
    ],
    examples: [
        "职场人必备：5个让你加薪30%的核心技能",
        "理财小白指南：7个让你财富翻倍的投资方法",
    ],
};

const HOWTO: TemplateSpec = TemplateSpec {
    name: "教程指南",
    title_formula: "如何/怎样 + {具体目标} + {时间/数量}",
    structure: [
        "标题：明确的how-to格式 + 具体可量化的目标",
        "开头：问题背景 + 方法预览 + 价值承诺",
        "正文：步骤分解 + 详细说明 + 注意事项 + 工具推荐",
        "结尾：效果预期 + 实践建议 + 进阶学习资源",
    ],
    examples: [
        "如何在30天内掌握Python编程：零基础完整指南",
        "怎样用100元开始理财：新手投资实操手册",
    ],
};

const BASE_TIPS: [&str; 5] = [
    "标题中使用具体数字增加可信度",
    "开头3句话内抓住读者注意力",
    "每段不超过3句话，保持可读性",
    "适当使用emoji增加视觉吸引力",
    "结尾要有明确的行动指引",
];

fn audience_tips(audience: &str) -> &'static [&'static str] {
    match audience {
        "youth" => &["使用年轻人熟悉的网络用语", "多用流行梗和表情包"],
        "professional" => &["提供实用的职场案例", "引用权威数据和研究"],
        "parent" => &["关注育儿和家庭场景", "提供实用的生活技巧"],
        "entrepreneur" => &["分享创业故事和经验", "提供商业思维和方法"],
        "senior" => &["语言通俗易懂", "多用传统价值观念"],
        _ => &[],
    }
}

#[derive(Debug, Clone, Default)]
pub struct TemplateGenerator;

impl TemplateGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Unknown kinds fall back to the listicle template.
    pub fn generate(
        &self,
        kind: &str,
        audience: &str,
        keywords: &str,
        now: DateTime<Utc>,
    ) -> WritingTemplate {
        let spec = match kind {
            "howto" => &HOWTO,
            _ => &LISTICLE,
        };

        WritingTemplate {
            kind: spec.name.to_string(),
            audience: audience.to_string(),
            keywords: keywords
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(String::from)
                .collect(),
            title_formula: spec.title_formula.to_string(),
            structure: spec.structure.iter().map(|s| s.to_string()).collect(),
            examples: spec.examples.iter().map(|s| s.to_string()).collect(),
            tips: BASE_TIPS
                .iter()
                .chain(audience_tips(audience))
                .map(|s| s.to_string())
                .collect(),
            generated_time: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_howto_for_parents() {
        let template = TemplateGenerator::new().generate("howto", "parent", "育儿, 早教", Utc::now());
        assert_eq!(template.kind, "教程指南");
        assert_eq!(template.keywords, vec!["育儿", "早教"]);
        assert_eq!(template.tips.len(), 7);
        assert_eq!(template.tips[5], "关注育儿和家庭场景");
    }

    #[test]
    fn test_unknown_kind_and_audience() {
        let template = TemplateGenerator::new().generate("poem", "aliens", "", Utc::now());
        assert_eq!(template.kind, "清单型文章");
        assert!(template.keywords.is_empty());
        assert_eq!(template.tips.len(), BASE_TIPS.len());
        assert_eq!(template.structure.len(), 4);
    }
}
