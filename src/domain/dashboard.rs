// Dashboard domain model
use super::chart::{BarChart, LineChart};
use super::kpi::KpiSummary;
use super::stages::PriceMetric;
use super::table::Table;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub title: String,
    pub sections: Vec<Section>,
}

impl Dashboard {
    pub fn new(title: String, sections: Vec<Section>) -> Self {
        Self { title, sections }
    }

    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }
}

/// Presenter stages in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionId {
    FullTable,
    ColumnSubset,
    PriceChart,
    CategoryFilter,
    CategoryDistribution,
    Kpis,
}

impl SectionId {
    pub const ORDER: [SectionId; 6] = [
        SectionId::FullTable,
        SectionId::ColumnSubset,
        SectionId::PriceChart,
        SectionId::CategoryFilter,
        SectionId::CategoryDistribution,
        SectionId::Kpis,
    ];
}

#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub id: SectionId,
    pub heading: String,
    pub body: Option<SectionBody>,
    pub notices: Vec<Notice>,
}

impl Section {
    pub fn new(id: SectionId, heading: String) -> Self {
        Self {
            id,
            heading,
            body: None,
            notices: Vec::new(),
        }
    }

    pub fn with_body(mut self, body: SectionBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_notice(mut self, notice: Notice) -> Self {
        self.notices.push(notice);
        self
    }

    pub fn has_errors(&self) -> bool {
        self.notices.iter().any(|n| n.level == NoticeLevel::Error)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SectionBody {
    Table {
        table: Table,
    },
    PriceChart {
        options: Vec<PriceMetric>,
        selected: Vec<PriceMetric>,
        chart: Option<LineChart>,
    },
    CategoryFilter {
        options: Vec<String>,
        selected: Option<String>,
        rows: Table,
    },
    BarChart {
        chart: BarChart,
    },
    Kpis {
        summary: KpiSummary,
        lines: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }
}

/// Titles and headings shown on the dashboard.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DashboardLabels {
    pub title: String,
    pub full_table: String,
    pub column_subset: String,
    pub price_chart: String,
    pub category_filter: String,
    pub category_distribution: String,
    pub kpis: String,
    pub bar_chart_title: String,
    pub bar_chart_x_label: String,
    pub bar_chart_y_label: String,
    pub load_failure: String,
}

impl Default for DashboardLabels {
    fn default() -> Self {
        Self {
            title: "Dashboard de Gestión de Inventarios".to_string(),
            full_table: "Datos del Inventario".to_string(),
            column_subset: "Columnas Específicas".to_string(),
            price_chart: "Análisis de Precios".to_string(),
            category_filter: "Filtro por Categoría".to_string(),
            category_distribution: "Análisis Exploratorio de Datos".to_string(),
            kpis: "Indicadores de Gestión".to_string(),
            bar_chart_title: "Distribución de Categorías".to_string(),
            bar_chart_x_label: "Categoría".to_string(),
            bar_chart_y_label: "Cantidad".to_string(),
            load_failure: "No se pudo cargar el dataset. Por favor, verifica la ruta del archivo."
                .to_string(),
        }
    }
}

impl DashboardLabels {
    pub fn heading(&self, id: SectionId) -> &str {
        match id {
            SectionId::FullTable => &self.full_table,
            SectionId::ColumnSubset => &self.column_subset,
            SectionId::PriceChart => &self.price_chart,
            SectionId::CategoryFilter => &self.category_filter,
            SectionId::CategoryDistribution => &self.category_distribution,
            SectionId::Kpis => &self.kpis,
        }
    }
}
