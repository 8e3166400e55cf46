use crate::color::{DrawColor, ShapeStyle};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DrawConfig {
    /// Attribute holding the sequential drawing name.
    pub name_key: String,
    /// Suffix of generated names: `"0001 - PLOT"`.
    pub name_label: String,
    /// Attribute carrying a packed-RGB colour in older data.
    pub legacy_color_key: String,
    pub initial_color: DrawColor,
    pub locale: DrawLocale,
}

impl Default for DrawConfig {
    fn default() -> Self {
        DrawConfig {
            name_key: "name".into(),
            name_label: "PLOT".into(),
            legacy_color_key: "borderColor".into(),
            initial_color: DrawColor::default(),
            locale: DrawLocale::default(),
        }
    }
}

/// Drawing-tool strings and label formatting, passed in instead of patched globally.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DrawLocale {
    pub toolbar: ToolbarText,
    pub labels: LabelText,
    pub decimal_separator: char,
    pub group_separator: char,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ToolbarText {
    pub cancel: String,
    pub cancel_title: String,
    pub finish: String,
    pub finish_title: String,
    pub undo: String,
    pub undo_title: String,
    pub polygon: String,
    pub rectangle: String,
    pub circle: String,
    pub polygon_start: String,
    pub polygon_cont: String,
    pub polygon_end: String,
    pub rectangle_start: String,
    pub circle_start: String,
    pub circle_radius: String,
    pub shape_end: String,
    pub save: String,
    pub save_title: String,
    pub edit_cancel_title: String,
    pub clear_all: String,
    pub clear_all_title: String,
    pub edit: String,
    pub edit_disabled: String,
    pub remove: String,
    pub remove_disabled: String,
    pub edit_tooltip: String,
    pub edit_subtext: String,
    pub remove_tooltip: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LabelText {
    pub area_title: String,
    pub circle_title: String,
    pub kind: String,
    pub area: String,
    pub points: String,
    pub coordinates: String,
    pub point: String,
    pub radius: String,
    pub center: String,
    pub polygon: String,
    pub rectangle: String,
    pub circle: String,
}

impl Default for DrawLocale {
    fn default() -> Self {
        DrawLocale {
            toolbar: ToolbarText::default(),
            labels: LabelText::default(),
            decimal_separator: '.',
            group_separator: ',',
        }
    }
}

impl Default for ToolbarText {
    fn default() -> Self {
        ToolbarText {
            cancel: "Cancel".into(),
            cancel_title: "Cancel drawing".into(),
            finish: "Finish".into(),
            finish_title: "Finish drawing".into(),
            undo: "Delete last point".into(),
            undo_title: "Delete last point drawn".into(),
            polygon: "Draw a polygon".into(),
            rectangle: "Draw a rectangle".into(),
            circle: "Draw a circle".into(),
            polygon_start: "Click to start drawing.".into(),
            polygon_cont: "Click to continue drawing.".into(),
            polygon_end: "Click the first point to close this polygon.".into(),
            rectangle_start: "Click and drag to draw a rectangle.".into(),
            circle_start: "Click and drag to draw a circle.".into(),
            circle_radius: "Radius".into(),
            shape_end: "Release mouse to finish drawing.".into(),
            save: "Save".into(),
            save_title: "Save changes".into(),
            edit_cancel_title: "Cancel editing, discards all changes".into(),
            clear_all: "Clear all".into(),
            clear_all_title: "Clear all layers".into(),
            edit: "Edit layers".into(),
            edit_disabled: "No layers to edit".into(),
            remove: "Delete layers".into(),
            remove_disabled: "No layers to delete".into(),
            edit_tooltip: "Drag handles or markers to edit features.".into(),
            edit_subtext: "Click cancel to undo changes.".into(),
            remove_tooltip: "Click on a feature to remove.".into(),
        }
    }
}

impl Default for LabelText {
    fn default() -> Self {
        LabelText {
            area_title: "Area details".into(),
            circle_title: "Circle details".into(),
            kind: "Type".into(),
            area: "Area".into(),
            points: "Points".into(),
            coordinates: "Coordinates".into(),
            point: "Point".into(),
            radius: "Radius".into(),
            center: "Center".into(),
            polygon: "Polygon".into(),
            rectangle: "Rectangle".into(),
            circle: "Circle".into(),
        }
    }
}

impl DrawLocale {
    /// Brazilian Portuguese strings with `1.234,56` number formatting.
    pub fn pt_br() -> Self {
        DrawLocale {
            toolbar: ToolbarText {
                cancel: "Cancelar".into(),
                cancel_title: "Cancelar desenho".into(),
                finish: "Finalizar".into(),
                finish_title: "Finalizar desenho".into(),
                undo: "Apagar último ponto".into(),
                undo_title: "Apagar último ponto desenhado".into(),
                polygon: "Desenhar um polígono".into(),
                rectangle: "Desenhar um retângulo".into(),
                circle: "Desenhar um círculo".into(),
                polygon_start: "Clique para começar a desenhar.".into(),
                polygon_cont: "Clique para continuar desenhando.".into(),
                polygon_end: "Clique no primeiro ponto para fechar o polígono.".into(),
                rectangle_start: "Clique e arraste para desenhar um retângulo.".into(),
                circle_start: "Clique e arraste para desenhar um círculo.".into(),
                circle_radius: "Raio".into(),
                shape_end: "Solte o mouse para finalizar.".into(),
                save: "Salvar".into(),
                save_title: "Salvar alterações".into(),
                edit_cancel_title: "Cancelar edição, descarta todas as alterações".into(),
                clear_all: "Limpar tudo".into(),
                clear_all_title: "Limpar todas as camadas".into(),
                edit: "Editar camadas".into(),
                edit_disabled: "Nenhuma camada para editar".into(),
                remove: "Excluir camadas".into(),
                remove_disabled: "Nenhuma camada para excluir".into(),
                edit_tooltip: "Arraste os pontos ou marcadores para editar.".into(),
                edit_subtext: "Clique em cancelar para desfazer as alterações.".into(),
                remove_tooltip: "Clique em um elemento para remover.".into(),
            },
            labels: LabelText {
                area_title: "Informações da Área".into(),
                circle_title: "Informações do Círculo".into(),
                kind: "Tipo".into(),
                area: "Área".into(),
                points: "Pontos".into(),
                coordinates: "Coordenadas".into(),
                point: "Ponto".into(),
                radius: "Raio".into(),
                center: "Centro".into(),
                polygon: "Polígono".into(),
                rectangle: "Retângulo".into(),
                circle: "Círculo".into(),
            },
            decimal_separator: ',',
            group_separator: '.',
        }
    }
}

/// Drawing toolbar description handed to the surface.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawControl {
    pub position: String,
    pub polygon: bool,
    pub rectangle: bool,
    pub circle: bool,
    pub polyline: bool,
    pub marker: bool,
    pub shape_style: ShapeStyle,
    pub text: ToolbarText,
}

impl DrawControl {
    pub fn new(color: &DrawColor, locale: &DrawLocale) -> Self {
        DrawControl {
            position: "topleft".into(),
            polygon: true,
            rectangle: true,
            circle: true,
            polyline: false,
            marker: false,
            shape_style: color.shape_style(),
            text: locale.toolbar.clone(),
        }
    }
}
